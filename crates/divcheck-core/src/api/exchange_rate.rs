//! Spot currency rate client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

use super::RateProvider;
use crate::config::DividendConfig;
use crate::currency;
use crate::error::{Result, StockError};
use crate::models::ExchangeRate;

/// Client for the `latest/<BASE>` style rate service
#[derive(Debug, Clone)]
pub struct ExchangeRateApiClient {
    client: Client,
    base_url: String,
}

/// Response body: rates per one unit of `base`
#[derive(Debug, Deserialize)]
pub struct LatestRates {
    pub base: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl ExchangeRateApiClient {
    pub fn new(config: &DividendConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.rate_api_url.clone(),
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiClient {
    async fn fetch_rate(&self, base: &str, quote: &str) -> Result<ExchangeRate> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| StockError::ConfigError(format!("{} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(base);

        debug!(%url, "Requesting exchange rate");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(StockError::ExchangeRateError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let latest: LatestRates = response.json().await?;
        extract_rate(&latest, base, quote)
    }
}

/// Pick `quote` out of a rates payload
pub fn extract_rate(latest: &LatestRates, base: &str, quote: &str) -> Result<ExchangeRate> {
    if let Some(reported) = &latest.base {
        if !reported.eq_ignore_ascii_case(base) {
            return Err(StockError::ExchangeRateError(format!(
                "asked for base {base}, service answered {reported}"
            )));
        }
    }

    let rate = latest
        .rates
        .get(quote)
        .copied()
        .ok_or_else(|| StockError::ExchangeRateError(format!("no {quote} rate for {base}")))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(StockError::ExchangeRateError(format!(
            "unusable {base}/{quote} rate: {rate}"
        )));
    }

    Ok(ExchangeRate {
        base: base.to_string(),
        quote: quote.to_string(),
        rate,
    })
}

/// Spot rate or `None`.
///
/// Failures are logged and swallowed here; callers show the degraded state.
/// Identical currencies short-circuit to 1.0 without a request. Minor-unit
/// codes such as `GBp` have no spot rate.
pub async fn spot_rate(provider: &dyn RateProvider, base: &str, quote: &str) -> Option<ExchangeRate> {
    if currency::is_minor_unit(base) || currency::is_minor_unit(quote) {
        warn!(base, quote, "No spot rate for a minor currency unit");
        return None;
    }

    if base.eq_ignore_ascii_case(quote) {
        return Some(ExchangeRate {
            base: base.to_string(),
            quote: quote.to_string(),
            rate: 1.0,
        });
    }

    match provider.fetch_rate(base, quote).await {
        Ok(rate) => {
            info!(base, quote, rate = rate.rate, "Fetched exchange rate");
            Some(rate)
        }
        Err(e) => {
            warn!(base, quote, error = %e, "Exchange rate unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockRateProvider;

    fn latest(json: &str) -> LatestRates {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_rate() {
        let rates = latest(r#"{"base":"USD","date":"2024-05-01","rates":{"USD":1,"KRW":1381.5,"EUR":0.93}}"#);
        let rate = extract_rate(&rates, "USD", "KRW").unwrap();
        assert_eq!(rate.rate, 1381.5);
        assert_eq!(rate.quote, "KRW");
    }

    #[test]
    fn test_extract_rate_missing_key() {
        let rates = latest(r#"{"base":"USD","rates":{"EUR":0.93}}"#);
        let err = extract_rate(&rates, "USD", "KRW").unwrap_err();
        assert!(matches!(err, StockError::ExchangeRateError(_)));
    }

    #[test]
    fn test_extract_rate_rejects_zero() {
        let rates = latest(r#"{"rates":{"KRW":0}}"#);
        assert!(extract_rate(&rates, "USD", "KRW").is_err());
    }

    #[test]
    fn test_extract_rate_base_mismatch() {
        let rates = latest(r#"{"base":"EUR","rates":{"KRW":1490.0}}"#);
        assert!(extract_rate(&rates, "USD", "KRW").is_err());
    }

    #[tokio::test]
    async fn test_spot_rate_same_currency_skips_call() {
        let mut provider = MockRateProvider::new();
        provider.expect_fetch_rate().never();

        let rate = spot_rate(&provider, "KRW", "KRW").await.unwrap();
        assert_eq!(rate.rate, 1.0);
    }

    #[tokio::test]
    async fn test_spot_rate_minor_unit_is_none() {
        let mut provider = MockRateProvider::new();
        provider.expect_fetch_rate().never();

        assert!(spot_rate(&provider, "GBp", "KRW").await.is_none());
        assert!(spot_rate(&provider, "GBp", "GBP").await.is_none());
    }

    #[tokio::test]
    async fn test_spot_rate_failure_is_none() {
        let mut provider = MockRateProvider::new();
        provider
            .expect_fetch_rate()
            .times(1)
            .returning(|_, _| Err(StockError::ExchangeRateError("timeout".to_string())));

        assert!(spot_rate(&provider, "USD", "KRW").await.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_live_rate() {
        let client = ExchangeRateApiClient::new(&DividendConfig::default()).unwrap();
        let rate = client.fetch_rate("USD", "KRW").await.unwrap();
        assert!(rate.rate > 0.0);
    }
}
