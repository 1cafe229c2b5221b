//! Logging configuration

use serde::{Deserialize, Serialize};

/// Environment variable selecting the log output format
pub const LOG_FORMAT_ENV: &str = "DIVCHECK_LOG_FORMAT";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "fmt" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging configuration shared by the binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub default_directive: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "warn,divcheck_core=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Defaults overridden by `DIVCHECK_LOG_FORMAT` when it names a known format
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(format) = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .as_deref()
            .and_then(LogFormat::parse)
        {
            config.format = format;
        }
        config
    }

    /// Replace the fallback filter directive
    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }
}
