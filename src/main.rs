mod args;
mod bench;
mod config;
mod dataset;
mod error;
mod keys;
mod loader;
mod redisjson;
mod report;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::args::{Args, Command};
use crate::bench::FetchStrategy;
use crate::config::Config;
use crate::loader::LoadOptions;
use crate::redisjson::RedisJsonStore;
use crate::store::Store;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_env()?;
    info!(
        batch_size = config.batch_size,
        dataset = %config.dataset_path.display(),
        "configuration loaded"
    );

    let runtime = configure_runtime()?;
    runtime.block_on(async {
        match args.command {
            Command::Load {
                total,
                continue_on_error,
            } => run_load_command(&config, total, continue_on_error).await,
            Command::Mget { n } => run_fetch_command(&config, FetchStrategy::MultiKey, n).await,
            Command::Pipeget { n } => run_fetch_command(&config, FetchStrategy::Pipelined, n).await,
        }
    })
}

/// One logical thread of execution: every store round trip is awaited to
/// completion before the next begins.
fn configure_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jsonbench={}", level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_load_command(config: &Config, total: u64, continue_on_error: bool) -> Result<()> {
    println!("Connecting to {} ...", config.redis_url);
    let store = RedisJsonStore::connect(&config.redis_url).await?;
    store.ping().await?;
    println!("Store connection successful");
    println!("Using batch size: {}", config.batch_size);
    println!("Target total records: {}", total);

    println!("Loading base dataset from {}", config.dataset_path.display());
    let base = dataset::load_base_dataset(&config.dataset_path)?;
    println!("Loaded {} base records", base.len());
    println!("Starting data load...");

    let options = LoadOptions {
        total,
        batch_size: config.batch_size,
        continue_on_error,
    };
    let report = loader::run_load(&store, &base, &options).await?;
    println!("{}", report);
    Ok(())
}

async fn run_fetch_command(config: &Config, strategy: FetchStrategy, n: i64) -> Result<()> {
    // Sample size is validated (and the keyset drawn) before any
    // connection is opened.
    let keys = keys::sample_product_keys(n, config.max_product_id)?;
    println!("Generated {} random product keys", keys.len());

    println!("Connecting to {}", config.redis_url);
    let store = RedisJsonStore::connect(&config.redis_url).await?;

    println!("\n=== Testing random keys (n={}) ===", n);
    let report = bench::run_fetch(&store, strategy, &keys).await;
    println!("{}", report);

    if !report.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}
