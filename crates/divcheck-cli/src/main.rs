//! Command-line dividend checker
//!
//! # Usage
//!
//! ```bash
//! # One lookup, then exit
//! divcheck 애플 --timeframe 5y
//!
//! # Interactive session
//! divcheck
//! ```

use clap::Parser;
use divcheck_core::bot::{BotConfig, BotReply, DividendBot};
use divcheck_core::interface::OutputFormat;
use divcheck_core::{DividendConfig, Timeframe};
use divcheck_utils::LogConfig;
use std::io::{self, BufRead, Write};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "divcheck")]
#[command(about = "배당 확인기 - look up dividends by company name or ticker", long_about = None)]
struct Args {
    /// Company name or ticker (e.g. 애플, AAPL); starts an interactive session when omitted
    query: Option<String>,

    /// Chart period: 1d 5d 1mo 3mo 6mo 1y 2y 5y 10y max
    #[arg(short, long)]
    timeframe: Option<Timeframe>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    divcheck_utils::init_tracing(&LogConfig::from_env());

    let args = Args::parse();

    let mut builder = DividendConfig::builder().with_env()?;
    if let Some(timeframe) = args.timeframe {
        builder = builder.default_timeframe(timeframe);
    }
    let config = BotConfig::builder()
        .dividend_config(builder.build()?)
        .output_format(args.format)
        .build();

    let mut bot = DividendBot::new(config)?;
    info!(timeframe = %bot.timeframe(), "Starting divcheck");

    if let Some(query) = args.query {
        println!("{}", bot.lookup(&query, bot.timeframe()).await);
        return Ok(());
    }

    println!("{}\n", bot.welcome());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", bot.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match bot.process_input(input).await {
            BotReply::Output(text) => println!("{text}\n"),
            BotReply::Exit => {
                println!("Goodbye!");
                break;
            }
        }
    }

    Ok(())
}
