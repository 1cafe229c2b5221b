//! Linear query pipeline: resolve, fetch, derive, hand over

use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::result::QueryPage;
use crate::api::{
    ExchangeRateApiClient, MarketDataProvider, RateProvider, YahooFinanceClient, spot_rate,
};
use crate::chart::CandlestickChart;
use crate::config::DividendConfig;
use crate::error::{Result, StockError};
use crate::models::{CompanyProfile, FetchOutcome, ResolvedTicker};
use crate::report::{self, DISPLAY_CURRENCY, DividendSection, ReportInput};
use crate::resolver;
use crate::timeframe::Timeframe;

/// Runs one full lookup per call; holds no state between calls
pub struct DividendChecker {
    market: Arc<dyn MarketDataProvider>,
    rates: Arc<dyn RateProvider>,
    config: Arc<DividendConfig>,
}

impl DividendChecker {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        rates: Arc<dyn RateProvider>,
        config: Arc<DividendConfig>,
    ) -> Self {
        Self {
            market,
            rates,
            config,
        }
    }

    /// Checker backed by Yahoo Finance and the configured rate service
    pub fn from_config(config: DividendConfig) -> Result<Self> {
        let market = Arc::new(YahooFinanceClient::new(&config)?);
        let rates = Arc::new(ExchangeRateApiClient::new(&config)?);
        Ok(Self::new(market, rates, Arc::new(config)))
    }

    pub fn config(&self) -> &DividendConfig {
        &self.config
    }

    /// Look up `query` and build every section of the page.
    ///
    /// Only a blank query is an error. Provider failures end up inside the
    /// page as failed sections.
    #[instrument(skip(self))]
    pub async fn run(&self, query: &str, timeframe: Timeframe) -> Result<QueryPage> {
        if query.trim().is_empty() {
            return Err(StockError::InvalidSymbol(
                "enter a company name or ticker".to_string(),
            ));
        }

        let ticker = resolver::resolve(query);
        info!(query, %ticker, "Resolved ticker");

        let profile = FetchOutcome::from_optional(self.market.fetch_profile(&ticker).await);
        if let FetchOutcome::Failed(e) = &profile {
            warn!(%ticker, error = %e, "Profile fetch failed");
        }
        let profile_currency = profile
            .data()
            .and_then(|p: &CompanyProfile| p.currency.clone());

        let (history, chart_currency) =
            match self.market.fetch_price_history(&ticker, timeframe).await {
                Ok(history) => (FetchOutcome::from_rows(Ok(history.bars)), history.currency),
                Err(e) => {
                    warn!(%ticker, error = %e, "Price history fetch failed");
                    (FetchOutcome::Failed(e.to_string()), None)
                }
            };

        let source_currency = chart_currency
            .or(profile_currency)
            .unwrap_or_else(|| self.config.fallback_currency.clone());

        let current_price = history.data().and_then(|bars| report::current_price(bars));
        let chart = history.map(|bars| {
            CandlestickChart::new(query.trim(), timeframe.as_range(), &source_currency, &bars)
        });

        let dividends = if matches!(chart, FetchOutcome::Empty) {
            info!(%ticker, "No price data, skipping dividends");
            DividendSection::Skipped
        } else {
            self.dividend_section(&ticker, current_price, &source_currency)
                .await
        };

        Ok(QueryPage {
            query: query.to_string(),
            ticker,
            timeframe,
            profile,
            chart,
            current_price,
            source_currency,
            dividends,
            generated_at: Utc::now(),
        })
    }

    /// `price_currency` is used when the dividend chart reports no currency
    async fn dividend_section(
        &self,
        ticker: &ResolvedTicker,
        current_price: Option<f64>,
        price_currency: &str,
    ) -> DividendSection {
        let history = match self.market.fetch_dividends(ticker).await {
            Ok(history) => history,
            Err(e) => {
                warn!(%ticker, error = %e, "Dividend fetch failed");
                return DividendSection::Failed(e.to_string());
            }
        };

        if history.events.is_empty() {
            info!(%ticker, "No dividend history");
            return DividendSection::NoDividends;
        }

        let source_currency = history
            .currency
            .unwrap_or_else(|| price_currency.to_string());
        let rate = spot_rate(self.rates.as_ref(), &source_currency, DISPLAY_CURRENCY).await;

        report::build_report(ReportInput {
            current_price,
            events: &history.events,
            rate: rate.as_ref(),
            source_currency: &source_currency,
            today: Local::now().date_naive(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMarketDataProvider, MockRateProvider};
    use crate::models::{DividendEvent, DividendHistory, ExchangeRate, PriceBar, PriceHistory};
    use chrono::{Months, NaiveDate};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bar(date: NaiveDate, close: f64) -> PriceBar {
        PriceBar {
            date,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
        }
    }

    fn recent(days_ago: u64) -> NaiveDate {
        Local::now().date_naive() - chrono::Days::new(days_ago)
    }

    fn quoted_in<T>(currency: &str, rows: Vec<T>) -> (Option<String>, Vec<T>) {
        (Some(currency.to_string()), rows)
    }

    fn usd_history(bars: Vec<PriceBar>) -> PriceHistory {
        let (currency, bars) = quoted_in("USD", bars);
        PriceHistory { currency, bars }
    }

    fn usd_dividends(events: Vec<DividendEvent>) -> DividendHistory {
        let (currency, events) = quoted_in("USD", events);
        DividendHistory { currency, events }
    }

    fn usd_profile() -> Option<CompanyProfile> {
        Some(CompanyProfile {
            symbol: "AAPL".to_string(),
            name: Some("Apple Inc.".to_string()),
            market_cap: Some(3.4e12),
            shares_outstanding: Some(15_204_100_096),
            currency: Some("USD".to_string()),
        })
    }

    fn checker(market: MockMarketDataProvider, rates: MockRateProvider) -> DividendChecker {
        DividendChecker::new(
            Arc::new(market),
            Arc::new(rates),
            Arc::new(DividendConfig::default()),
        )
    }

    fn rate_1300() -> MockRateProvider {
        let mut rates = MockRateProvider::new();
        rates
            .expect_fetch_rate()
            .withf(|base, quote| base == "USD" && quote == "KRW")
            .times(1)
            .returning(|base, quote| {
                Ok(ExchangeRate {
                    base: base.to_string(),
                    quote: quote.to_string(),
                    rate: 1300.0,
                })
            });
        rates
    }

    fn unwrap_report(section: DividendSection) -> crate::report::DividendReport {
        match section {
            DividendSection::Report(report) => report,
            other => panic!("expected a dividend report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_full_page() {
        let mut market = MockMarketDataProvider::new();
        market
            .expect_fetch_profile()
            .withf(|t| t.as_str() == "AAPL")
            .returning(|_| Ok(usd_profile()));
        market.expect_fetch_price_history().returning(|_, _| {
            Ok(usd_history(vec![
                bar(recent(1), 50.0),
                bar(recent(3), 48.0),
                bar(recent(2), 49.0),
            ]))
        });
        market.expect_fetch_dividends().returning(|_| {
            Ok(usd_dividends(vec![
                DividendEvent { ex_date: recent(200), amount: 1.5 },
                DividendEvent { ex_date: recent(20), amount: 2.0 },
                DividendEvent { ex_date: recent(100), amount: 1.25 },
            ]))
        });

        let page = checker(market, rate_1300())
            .run("애플", Timeframe::OneYear)
            .await
            .unwrap();

        assert_eq!(page.ticker.as_str(), "AAPL");
        assert_eq!(page.current_price, Some(50.0));
        assert_eq!(page.source_currency, "USD");
        assert_eq!(page.chart.data().unwrap().bars.len(), 3);

        let report = unwrap_report(page.dividends);
        assert_eq!(report.summary.last_amount, 2.0);
        assert_eq!(report.summary.dividend_yield, Some(4.0));
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].ex_date, recent(20));
        assert_eq!(report.rows[1].display_amount, Some(1625.0));
        assert_eq!(report.rows[1].after_tax_display_amount, Some(1381.0));
    }

    #[tokio::test]
    async fn test_empty_history_skips_dividends() {
        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|_| Ok(None));
        market
            .expect_fetch_price_history()
            .returning(|_, _| Ok(PriceHistory::default()));
        market.expect_fetch_dividends().never();
        let mut rates = MockRateProvider::new();
        rates.expect_fetch_rate().never();

        let page = checker(market, rates)
            .run("XYZ123", Timeframe::FiveDays)
            .await
            .unwrap();

        assert_eq!(page.ticker.as_str(), "XYZ123");
        assert_eq!(page.profile, FetchOutcome::Empty);
        assert_eq!(page.chart, FetchOutcome::Empty);
        assert_eq!(page.current_price, None);
        assert_eq!(page.dividends, DividendSection::Skipped);
    }

    #[tokio::test]
    async fn test_price_failure_still_reports_dividends() {
        let dividend_calls = Arc::new(AtomicUsize::new(0));
        let calls = Arc::clone(&dividend_calls);

        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|_| Ok(usd_profile()));
        market.expect_fetch_price_history().returning(|_, _| {
            Err(StockError::YahooFinanceError("HTTP error: 503".to_string()))
        });
        market.expect_fetch_dividends().returning(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(usd_dividends(vec![DividendEvent { ex_date: recent(10), amount: 1.25 }]))
        });

        let page = checker(market, rate_1300())
            .run("AAPL", Timeframe::OneYear)
            .await
            .unwrap();

        assert_eq!(dividend_calls.load(Ordering::SeqCst), 1);
        assert!(page.chart.is_failed());
        assert_eq!(page.current_price, None);

        let report = unwrap_report(page.dividends);
        assert_eq!(report.summary.dividend_yield, None);
        assert_eq!(report.summary.last_display_amount, Some(1625.0));
        assert_eq!(report.rows[0].after_tax_display_amount, Some(1381.0));
    }

    #[tokio::test]
    async fn test_profile_failure_keeps_other_sections() {
        let mut market = MockMarketDataProvider::new();
        market
            .expect_fetch_profile()
            .returning(|_| Err(StockError::YahooFinanceError("HTTP error: 500".to_string())));
        market
            .expect_fetch_price_history()
            .returning(|_, _| Ok(usd_history(vec![bar(recent(1), 20.0)])));
        market.expect_fetch_dividends().returning(|_| {
            Ok(usd_dividends(vec![DividendEvent { ex_date: recent(30), amount: 0.5 }]))
        });

        let page = checker(market, rate_1300())
            .run("AAPL", Timeframe::OneMonth)
            .await
            .unwrap();

        assert!(page.profile.is_failed());
        assert_eq!(page.source_currency, "USD");
        assert!(page.chart.data().is_some());
        assert!(matches!(page.dividends, DividendSection::Report(_)));
    }

    #[tokio::test]
    async fn test_krw_listing_keeps_currency_when_profile_fails() {
        let mut market = MockMarketDataProvider::new();
        market
            .expect_fetch_profile()
            .returning(|_| Err(StockError::YahooFinanceError("Invalid Crumb".to_string())));
        market.expect_fetch_price_history().returning(|_, _| {
            Ok(PriceHistory {
                currency: Some("KRW".to_string()),
                bars: vec![bar(recent(1), 70_000.0)],
            })
        });
        market.expect_fetch_dividends().returning(|_| {
            Ok(DividendHistory {
                currency: Some("KRW".to_string()),
                events: vec![DividendEvent { ex_date: recent(40), amount: 361.0 }],
            })
        });
        let mut rates = MockRateProvider::new();
        rates.expect_fetch_rate().never();

        let page = checker(market, rates)
            .run("삼성전자", Timeframe::OneYear)
            .await
            .unwrap();

        assert!(page.profile.is_failed());
        assert_eq!(page.source_currency, "KRW");

        let report = unwrap_report(page.dividends);
        assert_eq!(report.source_currency, "KRW");
        assert_eq!(report.summary.last_display_amount, Some(361.0));
        assert_eq!(report.rows[0].after_tax_display_amount, Some(307.0));
    }

    #[tokio::test]
    async fn test_chart_currency_wins_over_profile() {
        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|t| {
            Ok(Some(CompanyProfile {
                symbol: t.to_string(),
                currency: Some("GBp".to_string()),
                ..Default::default()
            }))
        });
        market.expect_fetch_price_history().returning(|_, _| {
            Ok(PriceHistory {
                currency: Some("GBP".to_string()),
                bars: vec![bar(recent(1), 0.72)],
            })
        });
        market.expect_fetch_dividends().returning(|_| {
            Ok(DividendHistory {
                currency: Some("GBP".to_string()),
                events: vec![DividendEvent { ex_date: recent(60), amount: 0.045 }],
            })
        });
        let mut rates = MockRateProvider::new();
        rates
            .expect_fetch_rate()
            .withf(|base, quote| base == "GBP" && quote == "KRW")
            .times(1)
            .returning(|base, quote| {
                Ok(ExchangeRate {
                    base: base.to_string(),
                    quote: quote.to_string(),
                    rate: 1800.0,
                })
            });

        let page = checker(market, rates)
            .run("VOD.L", Timeframe::OneYear)
            .await
            .unwrap();

        assert_eq!(page.source_currency, "GBP");
        let report = unwrap_report(page.dividends);
        assert_eq!(report.rows[0].display_amount, Some(81.0));
    }

    #[tokio::test]
    async fn test_no_dividends_is_not_an_error() {
        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|_| Ok(usd_profile()));
        market
            .expect_fetch_price_history()
            .returning(|_, _| Ok(usd_history(vec![bar(recent(1), 200.0)])));
        market
            .expect_fetch_dividends()
            .returning(|_| Ok(usd_dividends(vec![])));
        let mut rates = MockRateProvider::new();
        rates.expect_fetch_rate().never();

        let page = checker(market, rates)
            .run("테슬라", Timeframe::OneYear)
            .await
            .unwrap();

        assert_eq!(page.ticker.as_str(), "TSLA");
        assert_eq!(page.dividends, DividendSection::NoDividends);
        assert!(page.chart.data().is_some());
    }

    #[tokio::test]
    async fn test_dividend_failure_is_scoped() {
        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|_| Ok(usd_profile()));
        market
            .expect_fetch_price_history()
            .returning(|_, _| Ok(usd_history(vec![bar(recent(1), 200.0)])));
        market.expect_fetch_dividends().returning(|_| {
            Err(StockError::YahooFinanceError("connection reset".to_string()))
        });

        let page = checker(market, MockRateProvider::new())
            .run("AAPL", Timeframe::OneYear)
            .await
            .unwrap();

        assert!(matches!(page.dividends, DividendSection::Failed(_)));
        assert!(page.profile.data().is_some());
        assert_eq!(page.current_price, Some(200.0));
    }

    #[tokio::test]
    async fn test_rate_unavailable_degrades() {
        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|_| Ok(usd_profile()));
        market
            .expect_fetch_price_history()
            .returning(|_, _| Ok(usd_history(vec![bar(recent(1), 50.0)])));
        market.expect_fetch_dividends().returning(|_| {
            Ok(usd_dividends(vec![DividendEvent { ex_date: recent(10), amount: 2.0 }]))
        });
        let mut rates = MockRateProvider::new();
        rates
            .expect_fetch_rate()
            .returning(|_, _| Err(StockError::ExchangeRateError("no KRW rate".to_string())));

        let page = checker(market, rates)
            .run("AAPL", Timeframe::OneYear)
            .await
            .unwrap();

        let report = unwrap_report(page.dividends);
        assert!(report.is_degraded());
        assert_eq!(report.summary.dividend_yield, Some(4.0));
        assert_eq!(report.rows[0].display_amount, None);
    }

    #[tokio::test]
    async fn test_history_requested_for_resolved_ticker() {
        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|_| Ok(None));
        market
            .expect_fetch_price_history()
            .withf(|t, tf| t.as_str() == "005930.KS" && *tf == Timeframe::ThreeMonths)
            .returning(|_, _| {
                Ok(PriceHistory {
                    currency: Some("KRW".to_string()),
                    bars: vec![bar(recent(1), 70_000.0)],
                })
            });
        market.expect_fetch_dividends().returning(|_| Ok(DividendHistory::default()));

        let page = checker(market, MockRateProvider::new())
            .run("삼성전자", Timeframe::ThreeMonths)
            .await
            .unwrap();

        assert_eq!(page.ticker.as_str(), "005930.KS");
        assert_eq!(page.chart.data().unwrap().title, "삼성전자 3mo chart");
    }

    #[test]
    fn test_blank_query_rejected() {
        let checker = checker(MockMarketDataProvider::new(), MockRateProvider::new());
        let result = tokio_test::block_on(checker.run("   ", Timeframe::OneYear));
        assert!(matches!(result, Err(StockError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_old_dividends_outside_table_still_summarised() {
        let today = Local::now().date_naive();
        let old = today.checked_sub_months(Months::new(12 * 12)).unwrap();

        let mut market = MockMarketDataProvider::new();
        market.expect_fetch_profile().returning(|_| Ok(usd_profile()));
        market
            .expect_fetch_price_history()
            .returning(|_, _| Ok(usd_history(vec![bar(recent(1), 10.0)])));
        market.expect_fetch_dividends().returning(move |_| {
            Ok(usd_dividends(vec![DividendEvent { ex_date: old, amount: 0.1 }]))
        });

        let page = checker(market, rate_1300())
            .run("AAPL", Timeframe::Max)
            .await
            .unwrap();

        let report = unwrap_report(page.dividends);
        assert!(report.rows.is_empty());
        assert_eq!(report.summary.last_ex_date, old);
        assert_eq!(report.summary.dividend_yield, Some(1.0));
    }
}
