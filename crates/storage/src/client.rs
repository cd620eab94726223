use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::error::StoreError;
use crate::Store;

/// [`Store`](crate::Store) backed by a Redis server.
///
/// Holds one multiplexed connection; clones of it share the underlying
/// socket, so the struct is cheap to use behind an `Arc`. Every command is
/// wrapped in the same deadline, and a missed deadline is reported as
/// [`StoreError::Timeout`] rather than left to hang a request handler.
pub struct RedisStore {
    con: MultiplexedConnection,
    timeout: Duration,
}

impl RedisStore {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379`). The handshake is
    /// bounded by the same `timeout` later applied to every command.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let con = tokio::time::timeout(timeout, client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| StoreError::Timeout { op: "connect" })?
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { con, timeout })
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StoreError::Unavailable(e.to_string())),
            Err(_) => Err(StoreError::Timeout { op }),
        }
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.con.clone();
        self.bounded("get", con.get(key)).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        // SETEX rejects a zero expiry; clamp sub-second TTLs up to one second.
        let secs = ttl.as_secs().max(1);
        self.bounded("set_ex", con.set_ex(key, value, secs)).await
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut con = self.con.clone();
        self.bounded("incr", con.incr(key, 1i64)).await
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        self.bounded("zadd", con.zadd(key, member, score)).await
    }

    async fn zrem_range_by_rank(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<u64, StoreError> {
        let mut con = self.con.clone();
        self.bounded(
            "zremrangebyrank",
            con.zremrangebyrank(key, start as isize, stop as isize),
        )
        .await
    }

    async fn zrev_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        let mut con = self.con.clone();
        self.bounded("zrevrange", con.zrevrange(key, start as isize, stop as isize))
            .await
    }
}
