//! Clients for the market data and currency rate providers

pub mod exchange_rate;
pub mod yahoo;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CompanyProfile, DividendHistory, ExchangeRate, PriceHistory, ResolvedTicker};
use crate::timeframe::Timeframe;

pub use exchange_rate::{ExchangeRateApiClient, spot_rate};
pub use yahoo::YahooFinanceClient;

/// Source of company metadata, daily prices and dividend history.
///
/// `Ok(None)` or an empty history means the provider has nothing for the
/// ticker; `Err` means the request itself failed. Amounts come back in the
/// major unit of the reported currency.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_profile(&self, ticker: &ResolvedTicker) -> Result<Option<CompanyProfile>>;

    async fn fetch_price_history(
        &self,
        ticker: &ResolvedTicker,
        timeframe: Timeframe,
    ) -> Result<PriceHistory>;

    async fn fetch_dividends(&self, ticker: &ResolvedTicker) -> Result<DividendHistory>;
}

/// Source of spot currency rates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Units of `quote` per one unit of `base`
    async fn fetch_rate(&self, base: &str, quote: &str) -> Result<ExchangeRate>;
}
