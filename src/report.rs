use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::bench::FetchStrategy;

/// Outcome of one bulk-load run, finalized after the last flush.
///
/// Writes are fire-and-forget: per-document replies are ignored, so a
/// batch whose flush round trip succeeds counts as written in full.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub batch_size: usize,
    pub base_size: usize,
    pub written: u64,
    pub failed: u64,
    pub batches: u64,
    pub failed_batches: u64,
    pub elapsed: Duration,
}

impl LoadReport {
    /// Documents handed to the store, whether or not their flush succeeded.
    pub fn submitted(&self) -> u64 {
        self.written + self.failed
    }

    /// How many times the base dataset was cycled through.
    pub fn cycles(&self) -> u64 {
        if self.submitted() == 0 {
            0
        } else {
            (self.submitted() - 1) / self.base_size as u64 + 1
        }
    }

    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.written as f64 / secs
        } else {
            0.0
        }
    }
}

impl Display for LoadReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "\nLoaded {} JSON documents in {}",
            self.written,
            format_duration(self.elapsed)
        )?;
        if self.failed > 0 {
            writeln!(
                f,
                "WARNING: {} documents in {} failed batches were not written",
                self.failed, self.failed_batches
            )?;
        }
        writeln!(
            f,
            "Average rate: {:.1} docs/sec across {} batches",
            self.rate(),
            self.batches
        )?;
        writeln!(
            f,
            "Dataset cycles: {} (base dataset size: {})",
            self.cycles(),
            self.base_size
        )
    }
}

/// Outcome of one timed fetch round trip.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub strategy: FetchStrategy,
    pub requested: usize,
    pub elapsed: Duration,
    pub outcome: FetchOutcome,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The round trip came back; every key classified as hit or miss.
    Completed { hits: usize, misses: usize },
    /// The round trip itself failed; no per-key counts exist.
    Failed { category: String, message: String },
}

impl FetchReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Completed { .. })
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl Display for FetchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            FetchOutcome::Completed { hits, misses } => {
                writeln!(f, "{} success.", self.strategy.label())?;
                writeln!(
                    f,
                    "Successfully fetched: {}/{} keys in {:.2} ms",
                    hits,
                    self.requested,
                    self.elapsed_ms()
                )?;
                if *misses > 0 {
                    writeln!(
                        f,
                        "WARNING: {} keys returned empty results - data may be missing from the store",
                        misses
                    )
                } else {
                    writeln!(f, "All requested keys were found")
                }
            }
            FetchOutcome::Failed { category, message } => {
                writeln!(
                    f,
                    "{} failed: unable to retrieve data from the store",
                    self.strategy.label()
                )?;
                writeln!(f, "   error type: {}", category)?;
                writeln!(f, "   error message: {}", message)
            }
        }
    }
}

pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos() as f64;
    if nanos < 1_000.0 {
        format!("{:.2} ns", nanos)
    } else if nanos < 1_000_000.0 {
        format!("{:.2} µs", nanos / 1_000.0)
    } else if nanos < 1_000_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    }
}
