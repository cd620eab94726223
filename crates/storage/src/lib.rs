//! Store boundary for the arcade backend.
//!
//! Every stateful component talks to a [`Store`]: a deliberately small slice
//! of the Redis command surface, one round trip per call. [`RedisStore`] is
//! the production implementation; [`MemoryStore`] reproduces the same
//! semantics in-process for tests and local development.
//!
//! Key patterns in use:
//!
//! * `riddles`, `runner_obstacles` - JSON blobs with a TTL ([`TtlCache`])
//! * `{game}:{YYYYMMDD}` - per-day integer tallies ([`DailyTally`])
//! * `blitz_scores` - sorted set of score entries (see the `leaderboard` crate)

use async_trait::async_trait;
use std::time::Duration;

mod cache;
mod client;
mod counter;
mod error;
mod memory;

pub use cache::{CacheError, TtlCache};
pub use client::RedisStore;
pub use counter::{day_key, DailyTally};
pub use error::StoreError;
pub use memory::MemoryStore;

/// Minimal async key/value + sorted-set surface.
///
/// Implementations perform exactly one store round trip per call and bound
/// it with a deadline where the transport can stall.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the string stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Atomically add one to the integer at `key`, creating it at zero.
    /// Returns the post-increment value.
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// Insert `member` into the sorted set at `key`, ranked by `score`.
    /// Re-adding an existing member updates its score instead of duplicating.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), StoreError>;

    /// Remove members ranked within `[start, stop]`, both inclusive. Rank 0
    /// is the lowest score; negative ranks count back from the highest.
    /// A range that normalizes to nothing removes nothing. Returns the
    /// number of members removed.
    async fn zrem_range_by_rank(&self, key: &str, start: i64, stop: i64)
        -> Result<u64, StoreError>;

    /// Read members ranked within `[start, stop]` of the descending view,
    /// highest score first. Index rules match `zrem_range_by_rank`.
    async fn zrev_range(&self, key: &str, start: i64, stop: i64)
        -> Result<Vec<String>, StoreError>;
}
