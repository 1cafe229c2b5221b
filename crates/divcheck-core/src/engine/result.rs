//! Per-query page model

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chart::CandlestickChart;
use crate::models::{CompanyProfile, FetchOutcome, ResolvedTicker};
use crate::report::DividendSection;
use crate::timeframe::Timeframe;

/// Everything produced by one pass of the pipeline.
///
/// Each section carries its own outcome so renderers can show partial pages.
#[derive(Debug, Clone, Serialize)]
pub struct QueryPage {
    /// Text as typed by the user
    pub query: String,
    pub ticker: ResolvedTicker,
    pub timeframe: Timeframe,
    pub profile: FetchOutcome<CompanyProfile>,
    pub chart: FetchOutcome<CandlestickChart>,
    pub current_price: Option<f64>,
    /// Currency prices and payouts are quoted in
    pub source_currency: String,
    pub dividends: DividendSection,
    pub generated_at: DateTime<Utc>,
}

impl QueryPage {
    /// Heading label: the user's input, uppercased like the chart title
    pub fn label(&self) -> String {
        self.query.trim().to_uppercase()
    }
}
