//! Dividend figures derived from prices, payouts and a spot rate
//!
//! Everything here is pure: the caller passes the reference date, so the
//! history window is evaluated when the report is built and never cached.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::models::{DividendEvent, ExchangeRate, PriceBar};

/// Flat withholding tax applied to every converted payout
pub const WITHHOLDING_TAX_RATE: f64 = 0.15;

/// Currency figures are converted into
pub const DISPLAY_CURRENCY: &str = "KRW";

/// Years of payouts listed in the history table
pub const HISTORY_WINDOW_YEARS: u32 = 10;

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Close of the chronologically last bar, whatever order the bars arrive in
pub fn current_price(bars: &[PriceBar]) -> Option<f64> {
    bars.iter().max_by_key(|bar| bar.date).map(|bar| bar.close)
}

/// Event with the latest ex-dividend date
pub fn last_dividend(events: &[DividendEvent]) -> Option<&DividendEvent> {
    events.iter().max_by_key(|event| event.ex_date)
}

/// Yield in percent, two decimals. `None` unless the price is positive.
pub fn dividend_yield(amount: f64, price: f64) -> Option<f64> {
    if price > 0.0 && price.is_finite() {
        Some(round_to(amount / price * 100.0, 2))
    } else {
        None
    }
}

/// Earliest date in the reporting window
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(HISTORY_WINDOW_YEARS * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// One line of the dividend history table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendReportRow {
    pub ex_date: NaiveDate,
    /// Source currency, two decimals
    pub amount: f64,
    /// Display currency, whole units
    pub display_amount: Option<f64>,
    /// Display currency after withholding, whole units
    pub after_tax_display_amount: Option<f64>,
}

impl DividendReportRow {
    pub fn new(event: &DividendEvent, rate: Option<&ExchangeRate>) -> Self {
        let converted = rate.map(|r| r.convert(event.amount));
        Self {
            ex_date: event.ex_date,
            amount: round_to(event.amount, 2),
            display_amount: converted.map(f64::round),
            after_tax_display_amount: converted
                .map(|c| (c * (1.0 - WITHHOLDING_TAX_RATE)).round()),
        }
    }
}

/// Headline figures for the most recent payout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendSummary {
    pub last_ex_date: NaiveDate,
    /// Source currency, two decimals
    pub last_amount: f64,
    /// Display currency, whole units
    pub last_display_amount: Option<f64>,
    /// Percent of the current price
    pub dividend_yield: Option<f64>,
    /// First ex-dividend date on record
    pub history_start: NaiveDate,
}

/// Everything shown in the dividend section when payouts exist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendReport {
    pub source_currency: String,
    pub display_currency: String,
    pub rate: Option<ExchangeRate>,
    pub summary: DividendSummary,
    /// Payouts inside the window, newest first
    pub rows: Vec<DividendReportRow>,
}

impl DividendReport {
    /// Converted figures are missing because no rate was available
    pub fn is_degraded(&self) -> bool {
        self.rate.is_none()
    }
}

/// Outcome of building the dividend section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum DividendSection {
    /// No price data for the ticker, so dividends were not looked up
    Skipped,
    /// The dividend fetch failed
    Failed(String),
    /// The ticker has never paid a dividend
    NoDividends,
    Report(DividendReport),
}

/// Inputs to [`build_report`]
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// `None` when the price history could not be fetched
    pub current_price: Option<f64>,
    pub events: &'a [DividendEvent],
    pub rate: Option<&'a ExchangeRate>,
    pub source_currency: &'a str,
    pub today: NaiveDate,
}

/// Build the dividend section from already fetched data.
///
/// The summary always reads the full event list; the window filter and the
/// descending sort only shape the table.
pub fn build_report(input: ReportInput<'_>) -> DividendSection {
    let Some(last) = last_dividend(input.events) else {
        return DividendSection::NoDividends;
    };

    let history_start = input
        .events
        .iter()
        .map(|e| e.ex_date)
        .min()
        .unwrap_or(last.ex_date);

    let last_amount = round_to(last.amount, 2);
    let summary = DividendSummary {
        last_ex_date: last.ex_date,
        last_amount,
        last_display_amount: input.rate.map(|r| r.convert(last_amount).round()),
        dividend_yield: input
            .current_price
            .and_then(|price| dividend_yield(last_amount, price)),
        history_start,
    };

    let cutoff = window_start(input.today);
    let mut rows: Vec<DividendReportRow> = input
        .events
        .iter()
        .map(|event| DividendReportRow::new(event, input.rate))
        .filter(|row| row.ex_date >= cutoff)
        .collect();
    rows.sort_by(|a, b| b.ex_date.cmp(&a.ex_date));

    DividendSection::Report(DividendReport {
        source_currency: input.source_currency.to_string(),
        display_currency: DISPLAY_CURRENCY.to_string(),
        rate: input.rate.cloned(),
        summary,
        rows,
    })
}
