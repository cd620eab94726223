use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::error::StoreError;
use crate::Store;

/// Errors from [`TtlCache::get_or_generate`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode cached value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("value producer failed: {0}")]
    Generate(#[source] anyhow::Error),
}

/// Read-through JSON cache over a [`Store`](crate::Store).
///
/// Reads are forgiving: a missing, expired, unreadable or malformed entry
/// all fall through to the producer. Writes are strict, so a caller never
/// sees a success while the store silently dropped the value. Concurrent
/// callers may race past an expired entry and each run the producer; the
/// last write wins and the values they return are individually valid.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn Store>,
}

impl TtlCache {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Return the cached value under `key`, or invoke `producer`, store the
    /// result with `ttl`, and return it. The fresh value is stored before it
    /// is handed back.
    pub async fn get_or_generate<T, F>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> anyhow::Result<T> + Send,
    {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => log::warn!("cached value under `{key}` is malformed, regenerating: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("cache read for `{key}` failed, regenerating: {e}"),
        }

        let value = producer().map_err(CacheError::Generate)?;
        let raw = serde_json::to_string(&value)?;
        self.store.set_ex(key, &raw, ttl).await?;
        Ok(value)
    }
}
