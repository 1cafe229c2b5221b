//! Error types for dividend lookups

use thiserror::Error;

/// Errors raised while resolving, fetching or presenting a query
#[derive(Debug, Error)]
pub enum StockError {
    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Currency rate service error
    #[error("Exchange rate error: {0}")]
    ExchangeRateError(String),

    /// Unknown chart period
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unparseable interactive command
    #[error("Command error: {0}")]
    CommandError(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<url::ParseError> for StockError {
    fn from(err: url::ParseError) -> Self {
        StockError::ConfigError(format!("invalid URL: {err}"))
    }
}
