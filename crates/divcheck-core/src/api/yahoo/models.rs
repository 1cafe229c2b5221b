//! Yahoo Finance quoteSummary models.
//!
//! Only the fields read by the client are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;

/// Error object of the quoteSummary endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct YahooApiError {
    pub code: String,
    pub description: Option<String>,
}

impl YahooApiError {
    /// Yahoo's way of saying the symbol does not exist
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }

    pub fn message(&self) -> String {
        match &self.description {
            Some(description) => format!("{}: {}", self.code, description),
            None => self.code.clone(),
        }
    }
}

/// Envelope of the v10 quoteSummary endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummary {
    pub result: Option<Vec<QuoteSummaryResult>>,
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    pub price: Option<PriceModule>,
    pub default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatistics {
    pub shares_outstanding: Option<RawValue>,
}

/// Numeric field wrapper. Yahoo sends `{"raw": 1.0, "fmt": "1.00"}` or `{}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawValue {
    pub raw: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_raw_value_empty_object() {
        let value: RawValue = serde_json::from_str("{}").unwrap();
        assert_eq!(value.raw, None);

        let value: RawValue = serde_json::from_str(r#"{"raw": 15.5, "fmt": "15.50"}"#).unwrap();
        assert_eq!(value.raw, Some(15.5));
    }

    #[test]
    fn test_deserialize_summary_error() {
        let json = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: XYZ123"}}}"#;
        let response: QuoteSummaryResponse = serde_json::from_str(json).unwrap();
        let error = response.quote_summary.error.unwrap();
        assert!(error.is_not_found());
        assert_eq!(error.message(), "Not Found: Quote not found for symbol: XYZ123");
    }
}
