use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::Store;

/// `Store` backed by Redis with the RedisJSON module.
///
/// Documents live at the root path (`$`), where every read reply wraps the
/// document in a one-element array; the wrapper is stripped here so the
/// engines only ever see the document itself.
pub struct RedisJsonStore {
    con: MultiplexedConnection,
}

impl RedisJsonStore {
    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|err| Error::Connect {
            url: url.to_string(),
            source: err,
        })?;
        let con = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| Error::Connect {
                url: url.to_string(),
                source: err,
            })?;
        Ok(RedisJsonStore { con })
    }
}

#[async_trait]
impl Store for RedisJsonStore {
    async fn ping(&self) -> Result<()> {
        let mut con = self.con.clone();
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }

    async fn write_batch(&self, batch: &[(String, Value)]) -> Result<()> {
        let mut pipe = redis::pipe();
        for (key, document) in batch {
            pipe.cmd("JSON.SET")
                .arg(key)
                .arg("$")
                .arg(document.to_string())
                .ignore();
        }
        let mut con = self.con.clone();
        let _: () = pipe.query_async(&mut con).await?;
        debug!(documents = batch.len(), "flushed write pipeline");
        Ok(())
    }

    async fn fetch_many(&self, keys: &[String]) -> Result<Vec<Option<Value>>> {
        let mut cmd = redis::cmd("JSON.MGET");
        for key in keys {
            cmd.arg(key);
        }
        cmd.arg("$");
        let mut con = self.con.clone();
        let raw: Vec<Option<String>> = cmd.query_async(&mut con).await?;
        raw.into_iter().map(decode_document).collect()
    }

    async fn fetch_pipelined(&self, keys: &[String]) -> Result<Vec<Option<Value>>> {
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.cmd("JSON.GET").arg(key).arg("$");
        }
        let mut con = self.con.clone();
        let raw: Vec<Option<String>> = pipe.query_async(&mut con).await?;
        raw.into_iter().map(decode_document).collect()
    }
}

/// A root-path read reply is nil for a miss or a serialized array holding
/// the matched document; an empty array also counts as a miss.
fn decode_document(raw: Option<String>) -> Result<Option<Value>> {
    let payload = match raw {
        Some(payload) => payload,
        None => return Ok(None),
    };
    let parsed: Value = serde_json::from_str(&payload).map_err(|err| Error::Store {
        category: "parse".to_string(),
        message: format!("undecodable read reply: {}", err),
    })?;
    match parsed {
        Value::Array(mut items) => {
            if items.is_empty() {
                Ok(None)
            } else {
                Ok(Some(items.remove(0)))
            }
        }
        // Legacy-path replies carry the document without the array wrapper.
        other => Ok(Some(other)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_nil_is_a_miss() {
        assert_eq!(decode_document(None).unwrap(), None);
    }

    #[test]
    fn test_decode_strips_root_path_wrapper() {
        let decoded = decode_document(Some("[{\"id\":7,\"name\":\"x\"}]".to_string())).unwrap();
        assert_eq!(decoded, Some(json!({ "id": 7, "name": "x" })));
    }

    #[test]
    fn test_decode_empty_array_is_a_miss() {
        assert_eq!(decode_document(Some("[]".to_string())).unwrap(), None);
    }

    #[test]
    fn test_decode_unwrapped_document_passes_through() {
        let decoded = decode_document(Some("{\"id\":1}".to_string())).unwrap();
        assert_eq!(decoded, Some(json!({ "id": 1 })));
    }

    #[test]
    fn test_decode_garbage_is_a_parse_error() {
        let err = decode_document(Some("not json".to_string())).unwrap_err();
        assert_eq!(err.category(), "parse");
    }
}
