use anyhow::Result;
use botswarm_core::{AccountBalance, MarketData};
use botswarm_data::{GatewayConfig, MarketDataFeed, MarketGateway};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "botswarm")]
#[command(about = "Bot Swarm market data tools — quote lookup and account inspection")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live USD quotes for the given tokens
    Price {
        /// Token ids to quote (e.g. "bitcoin,ethereum,solana")
        #[arg(short, long, value_delimiter = ',', required = true)]
        tokens: Vec<String>,
    },

    /// Show the built-in preview quotes (no network access)
    Demo,

    /// Fetch the private account balance
    ///
    /// Requires TRADING_API_KEY and TRADING_API_SECRET to be set.
    Balance,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let gateway = MarketGateway::new(GatewayConfig::from_env());

    match cli.command {
        Commands::Price { tokens } => {
            let feed = MarketDataFeed::load(gateway, Some(tokens)).await;
            if let Some(error) = feed.error() {
                anyhow::bail!("Quote fetch failed: {}", error);
            }
            match feed.data() {
                Some(data) => print_quotes(data),
                None => println!("No quotes returned."),
            }
        }
        Commands::Demo => {
            let feed = MarketDataFeed::load(gateway, None).await;
            if let Some(data) = feed.data() {
                print_quotes(data);
            }
        }
        Commands::Balance => match gateway.account_balance().await.into_result() {
            Ok(balances) => print_balances(&balances),
            Err(error) => anyhow::bail!("Balance fetch failed: {}", error),
        },
    }

    Ok(())
}

fn print_quotes(data: &MarketData) {
    let mut rows: Vec<_> = data.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    println!("{:<12} {:>14} {:>10}", "TOKEN", "USD", "24H %");
    for (token, quote) in rows {
        let change = quote
            .usd_24h_change
            .map(|c| format!("{:+.2}", c))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<12} {:>14.2} {:>10}", token, quote.usd, change);
    }
}

fn print_balances(balances: &AccountBalance) {
    let mut rows: Vec<_> = balances.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    println!("{:<8} {:>14} {:>14}", "CCY", "AVAILABLE", "LOCKED");
    for (currency, balance) in rows {
        println!(
            "{:<8} {:>14.8} {:>14.8}",
            currency, balance.available, balance.locked
        );
    }
}
