//! Chart periods offered by the timeframe selector

use crate::error::StockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Period of daily price history to chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "max")]
    Max,
}

impl Timeframe {
    /// Every selectable period, shortest first
    pub const ALL: [Timeframe; 10] = [
        Timeframe::OneDay,
        Timeframe::FiveDays,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::SixMonths,
        Timeframe::OneYear,
        Timeframe::TwoYears,
        Timeframe::FiveYears,
        Timeframe::TenYears,
        Timeframe::Max,
    ];

    /// Range code understood by the chart endpoint
    pub fn as_range(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::FiveDays => "5d",
            Timeframe::OneMonth => "1mo",
            Timeframe::ThreeMonths => "3mo",
            Timeframe::SixMonths => "6mo",
            Timeframe::OneYear => "1y",
            Timeframe::TwoYears => "2y",
            Timeframe::FiveYears => "5y",
            Timeframe::TenYears => "10y",
            Timeframe::Max => "max",
        }
    }

    /// Space separated list of range codes, for help text
    pub fn options() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_range())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_range())
    }
}

impl FromStr for Timeframe {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_range() == code)
            .ok_or_else(|| {
                StockError::InvalidTimeframe(format!(
                    "{s} (expected one of: {})",
                    Self::options()
                ))
            })
    }
}
