//! Basic dividend lookup example
//!
//! Runs one query through the pipeline against live Yahoo Finance and
//! exchange-rate endpoints, then prints the terminal rendering.
//!
//! ```bash
//! cargo run -p divcheck-core --example basic_lookup 애플 5y
//! ```

use divcheck_core::interface::{Formatter, FormatterFactory, OutputFormat};
use divcheck_core::{DividendChecker, DividendConfig, Timeframe};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let query = args.get(1).map_or("AAPL", String::as_str);
    let timeframe = match args.get(2) {
        Some(raw) => raw.parse()?,
        None => Timeframe::default(),
    };

    let config = DividendConfig::builder().with_env()?.build()?;
    println!("Configuration:");
    println!("  - Profile endpoint: {}", config.yahoo_summary_url);
    println!("  - Rate endpoint: {}", config.rate_api_url);
    println!("  - Timeout: {:?}\n", config.request_timeout);

    let checker = DividendChecker::from_config(config)?;
    let page = checker.run(query, timeframe).await?;

    let formatter = FormatterFactory::create(OutputFormat::Text);
    println!("{}", formatter.format_page(&page));

    Ok(())
}
