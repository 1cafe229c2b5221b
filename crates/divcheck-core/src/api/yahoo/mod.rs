//! Yahoo Finance market data client
//!
//! Price history and dividend events come from the chart endpoint through
//! `yahoo_finance_api`. Company metadata comes from quoteSummary, which needs
//! a cookie + crumb pair; the handshake is repeated on every profile request
//! so nothing outlives a query.

mod models;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::{Client, StatusCode, header};
use tracing::{debug, info, warn};
use url::Url;
use yahoo_finance_api as yahoo;

use super::MarketDataProvider;
use crate::config::DividendConfig;
use crate::currency::{self, MajorUnit};
use crate::error::{Result, StockError};
use crate::models::{
    CompanyProfile, DividendEvent, DividendHistory, PriceBar, PriceHistory, ResolvedTicker,
};
use crate::timeframe::Timeframe;

pub use models::QuoteSummaryResponse;

/// Bar size for the price chart
const PRICE_INTERVAL: &str = "1d";

/// Interval used when only dividend events are of interest
const DIVIDEND_INTERVAL: &str = "1mo";

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    client: Client,
    summary_url: String,
    cookie_url: String,
    crumb_url: String,
}

/// Cookie and crumb for one quoteSummary request
#[derive(Debug)]
struct YahooSession {
    cookie: String,
    crumb: String,
}

impl YahooFinanceClient {
    /// Create a client from the configured endpoints
    pub fn new(config: &DividendConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            StockError::YahooFinanceError(format!("Failed to initialize Yahoo connector: {e}"))
        })?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            connector,
            client,
            summary_url: config.yahoo_summary_url.clone(),
            cookie_url: config.yahoo_cookie_url.clone(),
            crumb_url: config.yahoo_crumb_url.clone(),
        })
    }

    /// Chart response, or `None` when Yahoo has nothing for the symbol
    async fn fetch_chart(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Option<yahoo::YResponse>> {
        debug!(symbol, interval, range, "Requesting Yahoo chart");

        match self.connector.get_quote_range(symbol, interval, range).await {
            Ok(response) => Ok(Some(response)),
            Err(e) if is_no_data(&e) => {
                warn!(symbol, error = %e, "Yahoo has no chart data for this symbol");
                Ok(None)
            }
            Err(e) => Err(StockError::YahooFinanceError(e.to_string())),
        }
    }

    async fn open_session(&self) -> Result<YahooSession> {
        let response = self.client.get(&self.cookie_url).send().await?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| {
                StockError::YahooFinanceError("Failed to obtain Yahoo session cookie".to_string())
            })?;

        let crumb = self
            .client
            .get(&self.crumb_url)
            .header(header::COOKIE, &cookie)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let crumb = crumb.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(StockError::YahooFinanceError(
                "Yahoo returned an invalid crumb".to_string(),
            ));
        }

        Ok(YahooSession { cookie, crumb })
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch_profile(&self, ticker: &ResolvedTicker) -> Result<Option<CompanyProfile>> {
        let session = self.open_session().await?;
        let url = symbol_endpoint(&self.summary_url, ticker.as_str())?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("modules", "price,defaultKeyStatistics"),
                ("crumb", session.crumb.as_str()),
            ])
            .header(header::COOKIE, &session.cookie)
            .send()
            .await?;

        // Unknown symbols come back as 404 with a JSON error body
        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(StockError::YahooFinanceError(format!("HTTP error: {status}")));
        }

        let summary: QuoteSummaryResponse = serde_json::from_str(&response.text().await?)?;
        let profile = profile_from_summary(ticker.as_str(), summary)?;
        match &profile {
            Some(p) => info!(symbol = %ticker, name = ?p.name, "Fetched company profile"),
            None => warn!(symbol = %ticker, "Yahoo has no profile for this symbol"),
        }
        Ok(profile)
    }

    async fn fetch_price_history(
        &self,
        ticker: &ResolvedTicker,
        timeframe: Timeframe,
    ) -> Result<PriceHistory> {
        let symbol = ticker.as_str();
        let Some(response) = self
            .fetch_chart(symbol, PRICE_INTERVAL, timeframe.as_range())
            .await?
        else {
            return Ok(PriceHistory::default());
        };

        let context = ChartContext::from_response(symbol, &response);
        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) if is_no_data(&e) => Vec::new(),
            Err(e) => return Err(StockError::YahooFinanceError(e.to_string())),
        };

        let bars = price_bars(
            symbol,
            quotes
                .iter()
                .map(|q| (q.timestamp as i64, [q.open, q.high, q.low, q.close])),
            &context,
        )?;
        info!(
            symbol,
            %timeframe,
            bars = bars.len(),
            currency = ?context.currency(),
            "Fetched price history"
        );

        Ok(PriceHistory {
            currency: context.currency(),
            bars,
        })
    }

    async fn fetch_dividends(&self, ticker: &ResolvedTicker) -> Result<DividendHistory> {
        let symbol = ticker.as_str();
        let Some(response) = self
            .fetch_chart(symbol, DIVIDEND_INTERVAL, Timeframe::Max.as_range())
            .await?
        else {
            return Ok(DividendHistory::default());
        };

        let context = ChartContext::from_response(symbol, &response);
        let dividends = match response.dividends() {
            Ok(dividends) => dividends,
            Err(e) if is_no_data(&e) => Vec::new(),
            Err(e) => return Err(StockError::YahooFinanceError(e.to_string())),
        };

        let events = dividend_events(
            symbol,
            dividends.iter().map(|d| (d.date as i64, d.amount)),
            &context,
        )?;
        info!(symbol, events = events.len(), "Fetched dividend history");

        Ok(DividendHistory {
            currency: context.currency(),
            events,
        })
    }
}

/// Unknown symbols and empty ranges. Yahoo answers an unknown symbol with 404.
fn is_no_data(error: &yahoo::YahooError) -> bool {
    match error {
        yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult => true,
        yahoo::YahooError::FetchFailed(reason) => reason.contains("404"),
        _ => false,
    }
}

/// Currency and exchange clock of one chart response
#[derive(Debug, Clone, PartialEq)]
pub struct ChartContext {
    /// Major unit of the quoted currency; `None` when Yahoo reports none
    pub unit: Option<MajorUnit>,
    /// Exchange offset from UTC in seconds
    pub gmtoffset: i64,
}

impl ChartContext {
    pub fn new(currency: Option<&str>, gmtoffset: i64) -> Self {
        Self {
            unit: currency
                .filter(|code| !code.trim().is_empty())
                .map(currency::major_unit),
            gmtoffset,
        }
    }

    fn from_response(symbol: &str, response: &yahoo::YResponse) -> Self {
        match response.metadata() {
            Ok(meta) => {
                let currency: Option<String> = meta.currency.clone().into();
                Self::new(currency.as_deref(), i64::from(meta.gmtoffset))
            }
            Err(e) => {
                warn!(symbol, error = %e, "Chart response without metadata");
                Self::new(None, 0)
            }
        }
    }

    pub fn currency(&self) -> Option<String> {
        self.unit.as_ref().map(|unit| unit.code.clone())
    }

    /// Quoted amount in the major unit
    fn amount(&self, quoted: f64) -> f64 {
        self.unit
            .as_ref()
            .map_or(quoted, |unit| unit.convert(quoted))
    }

    /// Exchange-local date of a unix timestamp
    fn session_date(&self, timestamp: i64) -> Result<NaiveDate> {
        DateTime::from_timestamp(timestamp + self.gmtoffset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| {
                StockError::YahooFinanceError(format!("Invalid timestamp: {timestamp}"))
            })
    }
}

/// `base` with the symbol appended as one escaped path segment
fn symbol_endpoint(base: &str, symbol: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| StockError::ConfigError(format!("{base} cannot take a path")))?
        .pop_if_empty()
        .push(symbol);
    Ok(url)
}

/// Daily bars from `(timestamp, [open, high, low, close])` sessions, in
/// provider order. Sessions with a missing or non-positive price are skipped.
pub fn price_bars(
    symbol: &str,
    sessions: impl IntoIterator<Item = (i64, [f64; 4])>,
    context: &ChartContext,
) -> Result<Vec<PriceBar>> {
    let mut bars = Vec::new();
    for (timestamp, prices) in sessions {
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            debug!(symbol, timestamp, "Skipping session without prices");
            continue;
        }

        let [open, high, low, close] = prices.map(|p| context.amount(p));
        bars.push(PriceBar {
            date: context.session_date(timestamp)?,
            open,
            high,
            low,
            close,
        });
    }
    Ok(bars)
}

/// Dividend events from `(timestamp, amount)` records, sorted by ex-date
pub fn dividend_events(
    symbol: &str,
    records: impl IntoIterator<Item = (i64, f64)>,
    context: &ChartContext,
) -> Result<Vec<DividendEvent>> {
    let mut events = records
        .into_iter()
        .map(|(date, amount)| {
            if !amount.is_finite() || amount < 0.0 {
                return Err(StockError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("invalid dividend amount {amount}"),
                });
            }
            Ok(DividendEvent {
                ex_date: context.session_date(date)?,
                amount: context.amount(amount),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    events.sort_by_key(|event| event.ex_date);
    Ok(events)
}

/// Map a quoteSummary payload to a profile; absent fields stay `None`.
///
/// A "Not Found" payload or an empty result means Yahoo does not know the
/// symbol and yields `Ok(None)`.
pub fn profile_from_summary(
    symbol: &str,
    response: QuoteSummaryResponse,
) -> Result<Option<CompanyProfile>> {
    if let Some(error) = response.quote_summary.error {
        if error.is_not_found() {
            return Ok(None);
        }
        return Err(StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: error.message(),
        });
    }

    let Some(result) = response
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(None);
    };

    let price = result.price;
    let name = price
        .as_ref()
        .and_then(|p| p.short_name.clone().or_else(|| p.long_name.clone()));
    let currency = price
        .as_ref()
        .and_then(|p| p.currency.as_deref())
        .filter(|c| !c.trim().is_empty())
        .map(currency::canonical);
    let market_cap = price
        .as_ref()
        .and_then(|p| p.market_cap.as_ref())
        .and_then(|v| v.raw);
    let shares_outstanding = result
        .default_key_statistics
        .and_then(|s| s.shares_outstanding)
        .and_then(|v| v.raw)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u64);

    Ok(Some(CompanyProfile {
        symbol: symbol.to_string(),
        name,
        market_cap,
        shares_outstanding,
        currency,
    }))
}
