use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Seam between the engines and the JSON store.
///
/// All calls are one store round trip; the engines await each to
/// completion before issuing the next.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Round-trip liveness check
    async fn ping(&self) -> Result<()>;

    /// Submit a batch of documents in one non-transactional pipeline flush,
    /// ignoring per-document replies
    async fn write_batch(&self, batch: &[(String, Value)]) -> Result<()>;

    /// Fetch many keys in one multi-key command; positional results, null per miss
    async fn fetch_many(&self, keys: &[String]) -> Result<Vec<Option<Value>>>;

    /// Fetch each key with its own queued get, flushed together; positional results
    async fn fetch_pipelined(&self, keys: &[String]) -> Result<Vec<Option<Value>>>;
}
