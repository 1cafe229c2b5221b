//! Page formatting for the terminal and for machine consumers
//!
//! Formatters only lay out what the pipeline produced. Section order is
//! fixed: profile, chart, current price, dividend summary, history table.

use comfy_table::{CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde_json::json;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::engine::QueryPage;
use crate::error::StockError;
use crate::models::{CompanyProfile, FetchOutcome};
use crate::report::{DividendReport, DividendSection, HISTORY_WINDOW_YEARS, WITHHOLDING_TAX_RATE};
use crate::timeframe::Timeframe;

const UNAVAILABLE: &str = "정보 없음 (unavailable)";
const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 12;

/// Output flavour selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "terminal" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(StockError::ConfigError(format!(
                "unknown output format: {other} (expected text or json)"
            ))),
        }
    }
}

pub trait Formatter: Send + Sync {
    fn output_format(&self) -> OutputFormat;
    fn format_page(&self, page: &QueryPage) -> String;
    fn format_error(&self, error: &str) -> String;
    fn format_help(&self) -> String;
}

pub struct TerminalFormatter;

impl TerminalFormatter {
    fn profile_section(out: &mut String, label: &str, profile: &FetchOutcome<CompanyProfile>) {
        let _ = writeln!(out, "== {label} 종목 정보 (Company profile) ==");
        match profile {
            FetchOutcome::Data(p) => {
                let currency = p.currency.as_deref().unwrap_or("");
                let _ = writeln!(
                    out,
                    "Company name      : {}",
                    p.name.as_deref().unwrap_or(UNAVAILABLE)
                );
                let cap = p.market_cap.map_or_else(
                    || UNAVAILABLE.to_string(),
                    |cap| {
                        format!(
                            "{} {currency} (~{} B)",
                            group_digits(cap, 0),
                            group_digits(cap / 1e9, 2)
                        )
                    },
                );
                let _ = writeln!(out, "Market cap        : {}", cap.trim_end());
                let shares = p
                    .shares_outstanding
                    .map_or_else(|| UNAVAILABLE.to_string(), |s| group_digits(s as f64, 0));
                let _ = writeln!(out, "Shares outstanding: {shares}");
            }
            FetchOutcome::Empty => {
                let _ = writeln!(out, "No company information for this ticker.");
            }
            FetchOutcome::Failed(e) => {
                let _ = writeln!(out, "⚠ Company information unavailable: {e}");
            }
        }
        out.push('\n');
    }

    fn chart_section(out: &mut String, page: &QueryPage) {
        match &page.chart {
            FetchOutcome::Data(chart) => {
                let _ = writeln!(out, "== {} ==", chart.title);
                out.push_str(&chart.render_text(CHART_WIDTH, CHART_HEIGHT));
            }
            FetchOutcome::Empty => {
                let _ = writeln!(out, "== {} {} chart ==", page.label(), page.timeframe);
                let _ = writeln!(out, "이 종목에 대한 데이터가 없습니다. (No price data for this ticker/timeframe.)");
            }
            FetchOutcome::Failed(e) => {
                let _ = writeln!(out, "== {} {} chart ==", page.label(), page.timeframe);
                let _ = writeln!(out, "⚠ Price history unavailable: {e}");
            }
        }
        out.push('\n');
    }

    fn price_section(out: &mut String, page: &QueryPage) {
        if let Some(price) = page.current_price {
            let _ = writeln!(out, "== {} 현재 주가 (Current price) ==", page.label());
            let _ = writeln!(out, "{} {}", group_digits(price, 2), page.source_currency);
            out.push('\n');
        }
    }

    fn dividend_section(out: &mut String, page: &QueryPage) {
        match &page.dividends {
            DividendSection::Skipped => {
                let _ = writeln!(out, "No price data for this ticker; dividend lookup skipped.");
            }
            DividendSection::Failed(e) => {
                let _ = writeln!(out, "⚠ Dividend history unavailable: {e}");
            }
            DividendSection::NoDividends => {
                let _ = writeln!(out, "이 종목에 대한 배당 정보가 없습니다. (No dividend data for this ticker.)");
            }
            DividendSection::Report(report) => {
                Self::summary(out, &page.label(), report);
                out.push('\n');
                Self::history_table(out, report);
            }
        }
    }

    fn summary(out: &mut String, label: &str, report: &DividendReport) {
        let summary = &report.summary;
        let _ = writeln!(out, "== {label} 배당 정보 (Dividends) ==");
        let _ = writeln!(out, "Ex-dividend date  : {}", summary.last_ex_date);

        let mut last = format!("{:.2} {}", summary.last_amount, report.source_currency);
        if let Some(display) = summary.last_display_amount {
            let _ = write!(last, " / {} {}", group_digits(display, 0), report.display_currency);
        }
        let _ = writeln!(out, "Last dividend     : {last}");

        let yield_text = summary
            .dividend_yield
            .map_or_else(|| UNAVAILABLE.to_string(), |y| format!("{y:.2}%"));
        let _ = writeln!(out, "Dividend yield    : {yield_text}");
        let _ = writeln!(out, "History since     : {}", summary.history_start);

        if let Some(rate) = &report.rate {
            let _ = writeln!(
                out,
                "Exchange rate     : 1 {} = {} {}",
                rate.base,
                group_digits(rate.rate, 2),
                rate.quote
            );
        } else {
            let _ = writeln!(
                out,
                "⚠ 환율 정보를 가져올 수 없어 원화 환산 금액을 표시할 수 없습니다. (Exchange rate unavailable; {} amounts omitted.)",
                report.display_currency
            );
        }
    }

    fn history_table(out: &mut String, report: &DividendReport) {
        let _ = writeln!(
            out,
            "== 역대 배당 내역 (Dividend history, last {HISTORY_WINDOW_YEARS} years) =="
        );
        if report.rows.is_empty() {
            let _ = writeln!(out, "No dividends in the last {HISTORY_WINDOW_YEARS} years.");
            return;
        }

        let source = &report.source_currency;
        let display = &report.display_currency;
        let mut header = vec!["Ex-dividend date".to_string(), format!("Dividend ({source})")];
        if !report.is_degraded() {
            header.push(format!("Dividend ({display})"));
            header.push(format!(
                "After {:.0}% tax ({display})",
                WITHHOLDING_TAX_RATE * 100.0
            ));
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);

        for row in &report.rows {
            let mut cells = vec![row.ex_date.to_string(), format!("{:.2}", row.amount)];
            if !report.is_degraded() {
                cells.push(row.display_amount.map_or_else(String::new, |v| group_digits(v, 0)));
                cells.push(
                    row.after_tax_display_amount
                        .map_or_else(String::new, |v| group_digits(v, 0)),
                );
            }
            table.add_row(cells);
        }

        for index in 1..table.column_count() {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }

        let _ = writeln!(out, "{table}");
    }
}

impl Formatter for TerminalFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn format_page(&self, page: &QueryPage) -> String {
        let mut out = String::new();
        let label = page.label();
        Self::profile_section(&mut out, &label, &page.profile);
        Self::chart_section(&mut out, page);
        Self::price_section(&mut out, page);
        Self::dividend_section(&mut out, page);
        out
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ 오류가 발생했습니다 (Error): {error}")
    }

    fn format_help(&self) -> String {
        format!(
            "배당 확인기 (Dividend checker)\n\
            <name or ticker> [timeframe]  Look up a stock, e.g. 애플, AAPL, MSFT 5y\n\
            /range <timeframe>            Set the chart period ({})\n\
            /timeframes                   List chart periods\n\
            /help                         Show help\n\
            /exit                         Exit",
            Timeframe::options()
        )
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format_page(&self, page: &QueryPage) -> String {
        let value = json!({
            "query": page.query,
            "ticker": page.ticker,
            "timeframe": page.timeframe,
            "profile": page.profile,
            "chart": page.chart.clone().map(|chart| chart.to_plotly()),
            "current_price": page.current_price,
            "source_currency": page.source_currency,
            "dividends": page.dividends,
            "generated_at": page.generated_at,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|e| self.format_error(&e.to_string()))
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }

    fn format_help(&self) -> String {
        json!({
            "usage": "<name or ticker> [timeframe]",
            "timeframes": Timeframe::ALL,
            "commands": ["/range <timeframe>", "/timeframes", "/help", "/exit"],
        })
        .to_string()
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat) -> Box<dyn Formatter> {
        match format {
            OutputFormat::Text => Box::new(TerminalFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

/// `1234567.891` with 2 decimals becomes `1,234,567.89`
fn group_digits(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.decimals$}", value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
