//! Command parsing for the interactive session

use crate::error::{Result, StockError};
use crate::timeframe::Timeframe;

/// Parsed line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Look up a company name or ticker, optionally for one timeframe only
    Lookup {
        query: String,
        timeframe: Option<Timeframe>,
    },
    /// Change the session's chart period
    SetRange { timeframe: Timeframe },
    /// List chart periods
    Timeframes,
    /// Show help
    Help,
    /// Exit the session
    Exit,
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(StockError::CommandError("Empty input".to_string()));
        }

        if let Some(rest) = input.strip_prefix('/') {
            return Self::parse_slash(rest);
        }

        // A trailing range code applies to this lookup only
        if let Some((query, last)) = input.rsplit_once(char::is_whitespace) {
            if let Ok(timeframe) = last.parse::<Timeframe>() {
                return Ok(Command::Lookup {
                    query: query.trim().to_string(),
                    timeframe: Some(timeframe),
                });
            }
        }

        Ok(Command::Lookup {
            query: input.to_string(),
            timeframe: None,
        })
    }

    fn parse_slash(rest: &str) -> Result<Self> {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Err(StockError::CommandError("Empty command".to_string()));
        };

        let cmd = first.to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "range" | "r" | "timeframe" | "기간" => {
                let arg = args.first().ok_or_else(|| {
                    StockError::CommandError(format!(
                        "Missing timeframe ({})",
                        Timeframe::options()
                    ))
                })?;
                Ok(Command::SetRange {
                    timeframe: arg.parse()?,
                })
            }
            "timeframes" | "ranges" => Ok(Command::Timeframes),
            "help" | "h" | "?" | "도움말" => Ok(Command::Help),
            "exit" | "quit" | "q" | "종료" => Ok(Command::Exit),
            _ => Err(StockError::CommandError(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Lookup { .. } => "Dividend lookup",
            Command::SetRange { .. } => "Set chart period",
            Command::Timeframes => "List chart periods",
            Command::Help => "Show help",
            Command::Exit => "Exit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup() {
        let cmd = Command::parse("애플").unwrap();
        assert_eq!(
            cmd,
            Command::Lookup {
                query: "애플".to_string(),
                timeframe: None
            }
        );
    }

    #[test]
    fn test_parse_lookup_with_timeframe() {
        let cmd = Command::parse("  MSFT 5y ").unwrap();
        assert_eq!(
            cmd,
            Command::Lookup {
                query: "MSFT".to_string(),
                timeframe: Some(Timeframe::FiveYears)
            }
        );
    }

    #[test]
    fn test_parse_lookup_trailing_word_not_timeframe() {
        let cmd = Command::parse("Realty Income").unwrap();
        assert_eq!(
            cmd,
            Command::Lookup {
                query: "Realty Income".to_string(),
                timeframe: None
            }
        );
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            Command::parse("/range 10y").unwrap(),
            Command::SetRange {
                timeframe: Timeframe::TenYears
            }
        );
        assert_eq!(
            Command::parse("/기간 max").unwrap(),
            Command::SetRange {
                timeframe: Timeframe::Max
            }
        );
    }

    #[test]
    fn test_parse_range_errors() {
        assert!(Command::parse("/range").is_err());
        assert!(matches!(
            Command::parse("/range 3w"),
            Err(StockError::InvalidTimeframe(_))
        ));
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(Command::parse("/help").unwrap(), Command::Help);
        assert_eq!(Command::parse("/도움말").unwrap(), Command::Help);
        assert_eq!(Command::parse("/q").unwrap(), Command::Exit);
        assert_eq!(Command::parse("/timeframes").unwrap(), Command::Timeframes);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Command::parse("   ").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/watch AAPL").is_err());
    }
}
