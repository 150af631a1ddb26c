use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_DATASET_PATH: &str = "dataset.jsonl";
pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_MAX_PRODUCT_ID: u64 = 6_000_000;

/// Runtime settings, resolved once at startup and passed by reference
/// into the engines.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store connection URL (`REDIS_URL`).
    pub redis_url: String,
    /// Path to the line-delimited base dataset (`DATASET_PATH`).
    pub dataset_path: PathBuf,
    /// Documents per write pipeline flush (`BATCH_SIZE`).
    pub batch_size: usize,
    /// Upper bound of the sampled id range (`MAX_PRODUCT_ID`).
    pub max_product_id: u64,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset variables
    /// fall back to defaults; set-but-unparsable values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let redis_url = lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());
        let dataset_path = lookup("DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));
        let batch_size = parse_var(lookup("BATCH_SIZE"), "BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        let max_product_id = parse_var(
            lookup("MAX_PRODUCT_ID"),
            "MAX_PRODUCT_ID",
            DEFAULT_MAX_PRODUCT_ID,
        )?;

        if batch_size == 0 {
            bail!("BATCH_SIZE must be at least 1");
        }
        if max_product_id == 0 {
            bail!("MAX_PRODUCT_ID must be at least 1");
        }

        Ok(Config {
            redis_url,
            dataset_path,
            batch_size,
            max_product_id,
        })
    }
}

fn parse_var<T>(raw: Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid {} value {:?}", name, value)),
        None => Ok(default),
    }
}
