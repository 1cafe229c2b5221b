//! Candlestick chart geometry

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Value, json};

use crate::models::PriceBar;

/// Chart handed to the renderers: one OHLC quad per session, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub range_slider: bool,
    pub bars: Vec<PriceBar>,
}

impl CandlestickChart {
    /// Build a chart for `label` (the text the user typed) over `timeframe`
    pub fn new(label: &str, timeframe: &str, currency: &str, bars: &[PriceBar]) -> Self {
        let mut bars = bars.to_vec();
        bars.sort_by_key(|bar| bar.date);

        Self {
            title: format!("{} {timeframe} chart", label.to_uppercase()),
            x_axis_title: "Date".to_string(),
            y_axis_title: format!("Price ({currency})"),
            range_slider: true,
            bars,
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Lowest low and highest high
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.bars.is_empty() {
            return None;
        }
        let low = self.bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let high = self
            .bars
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((low, high))
    }

    /// Merge consecutive bars so at most `columns` remain
    pub fn bucketed(&self, columns: usize) -> Vec<PriceBar> {
        if columns == 0 || self.bars.is_empty() {
            return Vec::new();
        }
        let size = self.bars.len().div_ceil(columns);

        self.bars
            .chunks(size)
            .map(|chunk| {
                let first = chunk[0];
                let last = chunk[chunk.len() - 1];
                PriceBar {
                    date: last.date,
                    open: first.open,
                    high: chunk.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
                    low: chunk.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
                    close: last.close,
                }
            })
            .collect()
    }

    /// Plotly figure: one candlestick trace and a layout with the range slider
    pub fn to_plotly(&self) -> Value {
        let x: Vec<String> = self.bars.iter().map(|b| b.date.to_string()).collect();
        json!({
            "data": [{
                "type": "candlestick",
                "name": "Price",
                "x": x,
                "open": self.bars.iter().map(|b| b.open).collect::<Vec<_>>(),
                "high": self.bars.iter().map(|b| b.high).collect::<Vec<_>>(),
                "low": self.bars.iter().map(|b| b.low).collect::<Vec<_>>(),
                "close": self.bars.iter().map(|b| b.close).collect::<Vec<_>>(),
            }],
            "layout": {
                "title": { "text": self.title },
                "xaxis": {
                    "title": { "text": self.x_axis_title },
                    "rangeslider": { "visible": self.range_slider },
                },
                "yaxis": { "title": { "text": self.y_axis_title } },
            }
        })
    }

    /// Text candlestick plot, `height` rows by at most `width` columns.
    ///
    /// `│` is the high-low wick, `█` a rising body and `░` a falling one.
    pub fn render_text(&self, width: usize, height: usize) -> String {
        let Some((low, high)) = self.price_range() else {
            return String::new();
        };
        let height = height.max(2);
        let candles = self.bucketed(width);

        let span = (high - low).max(f64::EPSILON);
        let row_of = |price: f64| -> usize {
            let scaled = (high - price) / span * (height - 1) as f64;
            (scaled.round() as usize).min(height - 1)
        };

        let mut grid = vec![vec![' '; candles.len()]; height];
        for (col, candle) in candles.iter().enumerate() {
            for row in grid.iter_mut().take(row_of(candle.low) + 1).skip(row_of(candle.high)) {
                row[col] = '│';
            }

            let body = if candle.close >= candle.open { '█' } else { '░' };
            let (top, bottom) = (
                row_of(candle.open.max(candle.close)),
                row_of(candle.open.min(candle.close)),
            );
            for row in grid.iter_mut().take(bottom + 1).skip(top) {
                row[col] = body;
            }
        }

        let label_width = format!("{high:.2}").len().max(format!("{low:.2}").len());
        let mut out = String::new();
        for (i, row) in grid.iter().enumerate() {
            let label = if i == 0 {
                format!("{high:>label_width$.2}")
            } else if i == height - 1 {
                format!("{low:>label_width$.2}")
            } else {
                " ".repeat(label_width)
            };
            out.push_str(&label);
            out.push_str(" ┤");
            out.extend(row.iter());
            out.push('\n');
        }

        if let (Some(first), Some(last)) = (self.first_date(), self.last_date()) {
            let axis = format!("{first} .. {last}");
            out.push_str(&" ".repeat(label_width + 2));
            out.push_str(&axis);
            out.push('\n');
        }

        out
    }
}
