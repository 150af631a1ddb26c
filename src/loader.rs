use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::warn;

use crate::dataset::BaseRecord;
use crate::error::Result;
use crate::keys::product_key;
use crate::report::LoadReport;
use crate::store::Store;

/// Tuning for one bulk-load run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Total documents to derive and write.
    pub total: u64,
    /// Documents per pipeline flush.
    pub batch_size: usize,
    /// Count a failed flush and keep going instead of aborting the run.
    pub continue_on_error: bool,
}

/// Writes `total` documents derived from the base dataset, flushing the
/// write pipeline every `batch_size` documents. `base` must be non-empty
/// when `total > 0`.
///
/// The `i`-th document (0-based) is a copy of `base[i % base.len()]` with
/// `id` overwritten to `i + 1`, stored under `product:{i + 1}`. The final
/// partial batch is flushed after the loop.
pub async fn run_load<S: Store>(
    store: &S,
    base: &[BaseRecord],
    options: &LoadOptions,
) -> Result<LoadReport> {
    let start = Instant::now();
    let mut report = LoadReport {
        batch_size: options.batch_size,
        base_size: base.len(),
        written: 0,
        failed: 0,
        batches: 0,
        failed_batches: 0,
        elapsed: Duration::ZERO,
    };

    let mut batch: Vec<(String, Value)> = Vec::with_capacity(options.batch_size);
    for i in 0..options.total {
        let mut document = base[i as usize % base.len()].clone();
        document.insert("id".to_string(), Value::from(i + 1));
        batch.push((product_key(i + 1), Value::Object(document)));

        if batch.len() == options.batch_size {
            flush(store, &mut batch, &mut report, options).await?;
        }
    }
    if !batch.is_empty() {
        flush(store, &mut batch, &mut report, options).await?;
    }

    report.elapsed = start.elapsed();
    Ok(report)
}

async fn flush<S: Store>(
    store: &S,
    batch: &mut Vec<(String, Value)>,
    report: &mut LoadReport,
    options: &LoadOptions,
) -> Result<()> {
    let size = batch.len() as u64;
    report.batches += 1;
    match store.write_batch(batch).await {
        Ok(()) => {
            report.written += size;
            println!(
                "Batch {}: {} records | Total: {}",
                report.batches,
                size,
                report.submitted()
            );
        }
        Err(err) if options.continue_on_error => {
            report.failed += size;
            report.failed_batches += 1;
            warn!(batch = report.batches, error = %err, "batch flush failed, continuing");
        }
        Err(err) => return Err(err),
    }
    batch.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::store::mock::MockStore;

    fn base_records(n: usize) -> Vec<BaseRecord> {
        (0..n)
            .map(|i| match json!({ "name": format!("item-{}", i), "price": i }) {
                Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect()
    }

    fn options(total: u64, batch_size: usize) -> LoadOptions {
        LoadOptions {
            total,
            batch_size,
            continue_on_error: false,
        }
    }

    #[tokio::test]
    async fn test_flushes_full_batches_then_remainder() {
        let store = MockStore::new();
        let base = base_records(10);
        let report = run_load(&store, &base, &options(1200, 500)).await.unwrap();

        let flushed = store.flushed();
        assert_eq!(
            flushed.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![500, 500, 200]
        );
        assert_eq!(report.written, 1200);
        assert_eq!(report.failed, 0);
        assert_eq!(report.batches, 3);
        assert_eq!(report.base_size, 10);
        assert_eq!(report.cycles(), 120);
    }

    #[tokio::test]
    async fn test_keys_and_ids_are_sequential_from_one() {
        let store = MockStore::new();
        let base = base_records(10);
        run_load(&store, &base, &options(1200, 500)).await.unwrap();

        let flushed = store.flushed();
        assert_eq!(flushed[0][0].0, "product:1");
        assert_eq!(flushed[2][199].0, "product:1200");

        let mut expected_id = 1u64;
        for batch in &flushed {
            for (key, document) in batch {
                assert_eq!(key, &product_key(expected_id));
                assert_eq!(document["id"], json!(expected_id));
                expected_id += 1;
            }
        }
        assert_eq!(expected_id, 1201);
    }

    #[tokio::test]
    async fn test_records_cycle_through_base() {
        let store = MockStore::new();
        let base = base_records(10);
        run_load(&store, &base, &options(25, 500)).await.unwrap();

        let flushed = store.flushed();
        assert_eq!(flushed.len(), 1);
        let batch = &flushed[0];
        assert_eq!(batch[0].1["name"], "item-0");
        assert_eq!(batch[9].1["name"], "item-9");
        assert_eq!(batch[10].1["name"], "item-0");
        assert_eq!(batch[24].1["name"], "item-4");
    }

    #[tokio::test]
    async fn test_id_overwrites_existing_field_without_touching_base() {
        let store = MockStore::new();
        let base = vec![match json!({ "id": 999, "name": "fixed" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }];
        run_load(&store, &base, &options(3, 500)).await.unwrap();

        let flushed = store.flushed();
        assert_eq!(flushed[0][0].1["id"], json!(1));
        assert_eq!(flushed[0][2].1["id"], json!(3));
        assert_eq!(base[0]["id"], json!(999));
    }

    #[tokio::test]
    async fn test_zero_total_writes_nothing() {
        let store = MockStore::new();
        let base = base_records(3);
        let report = run_load(&store, &base, &options(0, 500)).await.unwrap();

        assert!(store.flushed().is_empty());
        assert_eq!(report.written, 0);
        assert_eq!(report.batches, 0);
        assert_eq!(report.cycles(), 0);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_remainder_flush() {
        let store = MockStore::new();
        let base = base_records(4);
        let report = run_load(&store, &base, &options(1000, 500)).await.unwrap();

        assert_eq!(
            store.flushed().iter().map(Vec::len).collect::<Vec<_>>(),
            vec![500, 500]
        );
        assert_eq!(report.batches, 2);
    }

    #[tokio::test]
    async fn test_failed_flush_aborts_by_default() {
        let store = MockStore::failing_flush_at(2);
        let base = base_records(10);
        let err = run_load(&store, &base, &options(1200, 500))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Store { .. }));
        assert_eq!(store.flushed().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_flush_is_counted_when_continuing() {
        let store = MockStore::failing_flush_at(2);
        let base = base_records(10);
        let options = LoadOptions {
            total: 1200,
            batch_size: 500,
            continue_on_error: true,
        };
        let report = run_load(&store, &base, &options).await.unwrap();

        assert_eq!(report.written, 700);
        assert_eq!(report.failed, 500);
        assert_eq!(report.batches, 3);
        assert_eq!(report.failed_batches, 1);
        assert_eq!(report.submitted(), 1200);

        let flushed = store.flushed();
        assert_eq!(
            flushed.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![500, 200]
        );
        assert_eq!(flushed[1][0].0, "product:1001");
    }
}
