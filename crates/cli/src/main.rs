use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use esg_core::domain::defaults::default_stocks;
use esg_core::domain::stock::PreferenceVector;
use esg_core::rank::rank;
use esg_core::storage::StockStore;

#[derive(Debug, Parser)]
#[command(name = "esg_cli", about = "Inspect and maintain the ESG stock database")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stock collection as JSON.
    List,

    /// Rank the collection against preference weights (0-100 each).
    Rank {
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        e: u8,
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        s: u8,
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        g: u8,
        /// Yield preference, already scaled (a 5.2% yield is 78).
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        y: u8,
        #[arg(long, default_value_t = 3)]
        top_n: usize,
    },

    /// Write the built-in collection to the configured store.
    Seed {
        /// Overwrite a collection that is already stored.
        #[arg(long)]
        force: bool,
    },

    /// Add one company from a JSON file shaped like a stock record.
    Add {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = esg_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let store = StockStore::from_config(&settings.store_config())?;

    let res = run(&store, args.command).await;
    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %format!("{err:#}"), "esg_cli failed");
    }
    res
}

async fn run(store: &StockStore, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let stocks = store.load().await;
            println!("{}", serde_json::to_string_pretty(&stocks)?);
        }
        Command::Rank { e, s, g, y, top_n } => {
            let prefs = PreferenceVector::new(e, s, g, y)?;
            let stocks = store.load().await;
            let ranked = rank(&stocks, &prefs, top_n);
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Command::Seed { force } => {
            let seeded = seed(store, force).await?;
            if !seeded {
                tracing::warn!("stock collection already stored; pass --force to overwrite");
            }
        }
        Command::Add { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let body: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let stock = store.add_stock(Some(&body)).await?;
            println!("{}", serde_json::to_string_pretty(&stock)?);
        }
    }
    Ok(())
}

/// Returns `false` when a collection exists and `force` is off.
async fn seed(store: &StockStore, force: bool) -> anyhow::Result<bool> {
    if !force {
        if let Some(existing) = store.load_stored().await {
            tracing::info!(count = existing.len(), "existing collection found");
            return Ok(false);
        }
    }

    let stocks = default_stocks();
    let backend = store.save(&stocks).await?;
    tracing::info!(backend, count = stocks.len(), "seeded built-in stock collection");
    Ok(true)
}

fn init_sentry(settings: &esg_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
