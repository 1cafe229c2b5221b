//! Dividend checker
//!
//! Looks up a stock by Korean company name or ticker, charts its price
//! history and reports dividend payouts converted to KRW with a flat
//! withholding tax deducted. It includes:
//!
//! - Name to ticker resolution over a fixed alias table
//! - Company profile, daily OHLC history and dividend history from Yahoo Finance
//! - Spot USD (or other trading currency) to KRW rates
//! - Dividend yield, converted and after-tax amounts, ten-year history table
//! - Terminal and JSON formatters, and an interactive session
//!
//! # Architecture
//!
//! A query runs straight through [`engine::DividendChecker`]:
//! resolver, then profile, price history and dividend fetches (each kept as
//! its own [`models::FetchOutcome`]), then the report builder. The resulting
//! [`engine::QueryPage`] is handed to an [`interface::Formatter`].
//!
//! # Example
//!
//! ```rust,ignore
//! use divcheck_core::{DividendChecker, DividendConfig, Timeframe};
//! use divcheck_core::interface::{Formatter, TerminalFormatter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let checker = DividendChecker::from_config(DividendConfig::default())?;
//!     let page = checker.run("애플", Timeframe::OneYear).await?;
//!     println!("{}", TerminalFormatter.format_page(&page));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod chart;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod interface;
pub mod models;
pub mod report;
pub mod resolver;
pub mod timeframe;

// Re-export main types for convenience
pub use config::DividendConfig;
pub use engine::{DividendChecker, QueryPage};
pub use error::{Result, StockError};
pub use models::{
    CompanyProfile, DividendEvent, DividendHistory, ExchangeRate, FetchOutcome, PriceBar,
    PriceHistory, ResolvedTicker,
};
pub use report::{DividendReport, DividendSection, WITHHOLDING_TAX_RATE};
pub use timeframe::Timeframe;
