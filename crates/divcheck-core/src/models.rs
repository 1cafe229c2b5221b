//! Data carried through a single query

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical exchange symbol produced by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedTicker(String);

impl ResolvedTicker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Company metadata. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub name: Option<String>,
    pub market_cap: Option<f64>,
    pub shares_outstanding: Option<u64>,
    /// Trading currency reported by the provider
    pub currency: Option<String>,
}

/// One daily OHLC session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A dividend payment keyed by its ex-dividend date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub ex_date: NaiveDate,
    /// Amount per share in the trading currency
    pub amount: f64,
}

/// Daily bars for one range, with the currency the prices are quoted in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Major-unit currency of the bars, when the provider reports one
    pub currency: Option<String>,
    pub bars: Vec<PriceBar>,
}

/// Full dividend record of a ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    /// Major-unit currency of the amounts, when the provider reports one
    pub currency: Option<String>,
    pub events: Vec<DividendEvent>,
}

/// Spot rate: units of `quote` per one unit of `base`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: String,
    pub quote: String,
    pub rate: f64,
}

impl ExchangeRate {
    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.rate
    }
}

/// Result of one independent fetch.
///
/// An empty dataset is a valid answer and is kept apart from a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed(String),
}

impl<T> FetchOutcome<T> {
    /// Wrap a single-value fetch, which is either data or a failure
    pub fn from_result(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Data(value),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    /// Wrap a lookup where `None` means the provider does not know the key
    pub fn from_optional(result: crate::Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => FetchOutcome::Data(value),
            Ok(None) => FetchOutcome::Empty,
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchOutcome::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Data(value) => FetchOutcome::Data(f(value)),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Failed(msg) => FetchOutcome::Failed(msg),
        }
    }
}

impl<T> FetchOutcome<Vec<T>> {
    /// Wrap a collection fetch, mapping an empty collection to `Empty`
    pub fn from_rows(result: crate::Result<Vec<T>>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => FetchOutcome::Empty,
            Ok(rows) => FetchOutcome::Data(rows),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}
