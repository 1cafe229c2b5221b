//! Interactive dividend checker session
//!
//! Holds only the selector state (chart period) and the output formatter;
//! every lookup goes through the pipeline from scratch.

pub mod commands;

use crate::config::DividendConfig;
use crate::engine::DividendChecker;
use crate::error::Result;
use crate::interface::{Formatter, FormatterFactory, OutputFormat};
use crate::resolver;
use crate::timeframe::Timeframe;

pub use commands::Command;

/// What the caller should do after a line of input
#[derive(Debug, Clone, PartialEq)]
pub enum BotReply {
    /// Print this and keep reading
    Output(String),
    /// End the session
    Exit,
}

/// Configuration for the interactive session
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Provider and query configuration
    pub dividend_config: DividendConfig,
    /// Welcome message
    pub welcome_message: String,
    /// Prompt prefix
    pub prompt: String,
    /// Output format
    pub output_format: OutputFormat,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            dividend_config: DividendConfig::default(),
            welcome_message: "배당 확인기 - 종목 이름 또는 티커를 입력하세요 (예: 애플, AAPL). /help 로 도움말".to_string(),
            prompt: ">>> ".to_string(),
            output_format: OutputFormat::Text,
        }
    }
}

impl BotConfig {
    /// Create a builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    dividend_config: Option<DividendConfig>,
    welcome_message: Option<String>,
    prompt: Option<String>,
    output_format: Option<OutputFormat>,
}

impl BotConfigBuilder {
    /// Set provider configuration
    pub fn dividend_config(mut self, config: DividendConfig) -> Self {
        self.dividend_config = Some(config);
        self
    }

    /// Set welcome message
    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    /// Set prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Build the config
    pub fn build(self) -> BotConfig {
        let defaults = BotConfig::default();
        BotConfig {
            dividend_config: self.dividend_config.unwrap_or(defaults.dividend_config),
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt: self.prompt.unwrap_or(defaults.prompt),
            output_format: self.output_format.unwrap_or(defaults.output_format),
        }
    }
}

/// Interactive session over a [`DividendChecker`]
pub struct DividendBot {
    checker: DividendChecker,
    formatter: Box<dyn Formatter>,
    timeframe: Timeframe,
    config: BotConfig,
}

impl DividendBot {
    /// Session backed by the live providers
    pub fn new(config: BotConfig) -> Result<Self> {
        let checker = DividendChecker::from_config(config.dividend_config.clone())?;
        Ok(Self::with_checker(checker, config))
    }

    /// Session over an existing checker
    pub fn with_checker(checker: DividendChecker, config: BotConfig) -> Self {
        Self {
            formatter: FormatterFactory::create(config.output_format),
            timeframe: config.dividend_config.default_timeframe,
            checker,
            config,
        }
    }

    /// Get the welcome message
    pub fn welcome(&self) -> &str {
        &self.config.welcome_message
    }

    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    /// Currently selected chart period
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Process one line of input. Errors come back formatted, never as `Err`.
    pub async fn process_input(&mut self, input: &str) -> BotReply {
        match Command::parse(input) {
            Ok(command) => self.execute_command(command).await,
            Err(e) => BotReply::Output(self.formatter.format_error(&e.to_string())),
        }
    }

    /// Execute a parsed command
    pub async fn execute_command(&mut self, command: Command) -> BotReply {
        match command {
            Command::Lookup { query, timeframe } => {
                BotReply::Output(self.lookup(&query, timeframe.unwrap_or(self.timeframe)).await)
            }
            Command::SetRange { timeframe } => {
                self.timeframe = timeframe;
                BotReply::Output(format!("Chart period set to {timeframe}"))
            }
            Command::Timeframes => {
                let names: Vec<String> = resolver::aliases()
                    .into_iter()
                    .map(|(name, ticker)| format!("{name}={ticker}"))
                    .collect();
                BotReply::Output(format!(
                    "Chart periods: {} (current: {})\nKnown names: {}",
                    Timeframe::options(),
                    self.timeframe,
                    names.join(", ")
                ))
            }
            Command::Help => BotReply::Output(self.formatter.format_help()),
            Command::Exit => BotReply::Exit,
        }
    }

    /// Run one lookup and format the page or the error
    pub async fn lookup(&self, query: &str, timeframe: Timeframe) -> String {
        match self.checker.run(query, timeframe).await {
            Ok(page) => self.formatter.format_page(&page),
            Err(e) => self.formatter.format_error(&e.to_string()),
        }
    }
}
