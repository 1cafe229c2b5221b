//! Configuration for dividend lookups

use crate::error::{Result, StockError};
use crate::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Configuration for provider endpoints and query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendConfig {
    /// Yahoo quoteSummary endpoint (company profile)
    pub yahoo_summary_url: String,

    /// Page handing out the session cookie
    pub yahoo_cookie_url: String,

    /// Endpoint returning the crumb for the session cookie
    pub yahoo_crumb_url: String,

    /// Currency rate endpoint, base currency appended as last path segment
    pub rate_api_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// User agent sent to Yahoo
    pub user_agent: String,

    /// Chart period used when a query does not name one
    pub default_timeframe: Timeframe,

    /// Trading currency assumed when neither the chart nor the profile reports one
    pub fallback_currency: String,
}

impl Default for DividendConfig {
    fn default() -> Self {
        Self {
            yahoo_summary_url: "https://query1.finance.yahoo.com/v10/finance/quoteSummary"
                .to_string(),
            yahoo_cookie_url: "https://fc.yahoo.com".to_string(),
            yahoo_crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
            rate_api_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_timeframe: Timeframe::OneYear,
            fallback_currency: "USD".to_string(),
        }
    }
}

impl DividendConfig {
    /// Create a new configuration builder
    pub fn builder() -> DividendConfigBuilder {
        DividendConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("yahoo_summary_url", &self.yahoo_summary_url),
            ("yahoo_cookie_url", &self.yahoo_cookie_url),
            ("yahoo_crumb_url", &self.yahoo_crumb_url),
            ("rate_api_url", &self.rate_api_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| StockError::ConfigError(format!("{name}: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(StockError::ConfigError(format!(
                    "{name} must be an http(s) URL, got {value}"
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.fallback_currency.trim().is_empty() {
            return Err(StockError::ConfigError(
                "fallback_currency must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for DividendConfig
#[derive(Debug, Default)]
pub struct DividendConfigBuilder {
    yahoo_summary_url: Option<String>,
    rate_api_url: Option<String>,
    request_timeout: Option<Duration>,
    default_timeframe: Option<Timeframe>,
    fallback_currency: Option<String>,
}

impl DividendConfigBuilder {
    /// Set the quoteSummary endpoint
    pub fn yahoo_summary_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_summary_url = Some(url.into());
        self
    }

    /// Set the currency rate endpoint
    pub fn rate_api_url(mut self, url: impl Into<String>) -> Self {
        self.rate_api_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the default chart period
    pub fn default_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.default_timeframe = Some(timeframe);
        self
    }

    /// Set the currency assumed when the provider reports none
    pub fn fallback_currency(mut self, currency: impl Into<String>) -> Self {
        self.fallback_currency = Some(currency.into());
        self
    }

    /// Apply `DIVCHECK_*` environment overrides on top of what is already set
    pub fn with_env(self) -> Result<Self> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("DIVCHECK_RATE_API_URL") {
            self.rate_api_url = Some(url);
        }
        if let Some(url) = lookup("DIVCHECK_YAHOO_SUMMARY_URL") {
            self.yahoo_summary_url = Some(url);
        }
        if let Some(secs) = lookup("DIVCHECK_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                StockError::ConfigError(format!("DIVCHECK_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(tf) = lookup("DIVCHECK_TIMEFRAME") {
            self.default_timeframe = Some(tf.parse()?);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<DividendConfig> {
        let defaults = DividendConfig::default();

        let config = DividendConfig {
            yahoo_summary_url: self.yahoo_summary_url.unwrap_or(defaults.yahoo_summary_url),
            yahoo_cookie_url: defaults.yahoo_cookie_url,
            yahoo_crumb_url: defaults.yahoo_crumb_url,
            rate_api_url: self.rate_api_url.unwrap_or(defaults.rate_api_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            user_agent: defaults.user_agent,
            default_timeframe: self.default_timeframe.unwrap_or(defaults.default_timeframe),
            fallback_currency: self
                .fallback_currency
                .map(|c| c.trim().to_ascii_uppercase())
                .unwrap_or(defaults.fallback_currency),
        };

        config.validate()?;
        Ok(config)
    }
}
