//! Company name to ticker resolution

use crate::models::ResolvedTicker;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Korean company names and the symbols they trade under
static TICKER_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("애플", "AAPL"),
        ("마이크로소프트", "MSFT"),
        ("테슬라", "TSLA"),
        ("삼성전자", "005930.KS"),
        // NAVER trades on KOSPI, so the KOSDAQ suffix .KQ finds nothing
        ("네이버", "035420.KS"),
    ])
});

/// Map a name or symbol to the ticker to query.
///
/// Unknown input is passed through as-is (after trimming); a bad symbol only
/// shows up later as an empty provider response.
pub fn resolve(query: &str) -> ResolvedTicker {
    let query = query.trim();
    let symbol = TICKER_ALIASES.get(query).copied().unwrap_or(query);
    ResolvedTicker::new(symbol)
}

/// Known aliases, sorted by name
pub fn aliases() -> Vec<(&'static str, &'static str)> {
    let mut entries: Vec<_> = TICKER_ALIASES.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_korean_name() {
        assert_eq!(resolve("애플").as_str(), "AAPL");
        assert_eq!(resolve(" 삼성전자 ").as_str(), "005930.KS");
    }

    #[test]
    fn test_naver_resolves_to_kospi_listing() {
        assert_eq!(resolve("네이버").as_str(), "035420.KS");
        assert!(aliases().iter().all(|(_, ticker)| !ticker.ends_with(".KQ")));
    }

    #[test]
    fn test_resolve_passthrough() {
        assert_eq!(resolve("XYZ123").as_str(), "XYZ123");
        assert_eq!(resolve("msft").as_str(), "msft");
    }

    #[test]
    fn test_aliases_listed() {
        let entries = aliases();
        assert_eq!(entries.len(), 5);
        assert!(entries.contains(&("테슬라", "TSLA")));
    }
}
