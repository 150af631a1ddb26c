use std::time::Instant;

use tracing::debug;

use crate::error::Error;
use crate::report::{FetchOutcome, FetchReport};
use crate::store::Store;

/// How a sampled keyset is fetched in one round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// One multi-key command covering the whole keyset.
    MultiKey,
    /// One queued get per key, flushed together.
    Pipelined,
}

impl FetchStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            FetchStrategy::MultiKey => "JSON.MGET",
            FetchStrategy::Pipelined => "pipeline JSON.GET",
        }
    }
}

/// Times one fetch round trip over `keys` and classifies every positional
/// result as a hit (non-null) or a miss (null).
///
/// A failed round trip is data, not an error: it lands in the report with
/// the store error's category and message, and no partial counts.
pub async fn run_fetch<S: Store>(store: &S, strategy: FetchStrategy, keys: &[String]) -> FetchReport {
    println!("Attempting {} for {} keys", strategy.label(), keys.len());
    println!("Sample keys: {}", preview(keys));

    let start = Instant::now();
    let result = match strategy {
        FetchStrategy::MultiKey => store.fetch_many(keys).await,
        FetchStrategy::Pipelined => store.fetch_pipelined(keys).await,
    };
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(results) => {
            let hits = results.iter().filter(|result| result.is_some()).count();
            FetchOutcome::Completed {
                hits,
                misses: keys.len() - hits,
            }
        }
        Err(err) => {
            debug!(error = %err, "fetch round trip failed");
            let category = err.category().to_string();
            let message = match err {
                Error::Store { message, .. } => message,
                other => other.to_string(),
            };
            FetchOutcome::Failed { category, message }
        }
    };

    FetchReport {
        strategy,
        requested: keys.len(),
        elapsed,
        outcome,
    }
}

fn preview(keys: &[String]) -> String {
    let head: Vec<&str> = keys.iter().take(5).map(String::as_str).collect();
    if keys.len() > 5 {
        format!("{:?}...", head)
    } else {
        format!("{:?}", head)
    }
}
