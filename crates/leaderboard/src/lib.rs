//! Bounded, anonymous leaderboard over a ranked store collection.
//!
//! Entries live in a single sorted set keyed by score. Every submission is
//! followed by a trim that drops the lowest-ranked members beyond the
//! configured capacity, so the set can never grow past it no matter how
//! submissions interleave.

pub mod models;

pub use models::ScoreEntry;

use std::sync::Arc;

use storage::{Store, StoreError};
use thiserror::Error;

/// Entries retained after every submission unless overridden.
pub const DEFAULT_CAPACITY: u64 = 100;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode score entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Capacity-bounded score board backed by one sorted set.
#[derive(Clone)]
pub struct BoundedLeaderboard {
    store: Arc<dyn Store>,
    key: String,
    capacity: u64,
}

impl BoundedLeaderboard {
    pub fn new(store: Arc<dyn Store>, key: impl Into<String>) -> Self {
        Self::with_capacity(store, key, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn Store>, key: impl Into<String>, capacity: u64) -> Self {
        Self {
            store,
            key: key.into(),
            capacity,
        }
    }

    /// Record `score` stamped with the current time, then trim back to
    /// capacity. Any score value is accepted; only store and encoding
    /// failures error.
    pub async fn submit(&self, score: i64) -> Result<(), LeaderboardError> {
        self.submit_entry(ScoreEntry::new(score)).await
    }

    /// Record a fully-formed entry. `submit` is the public path; this layer
    /// pins the timestamp, which the dedup and ordering tests rely on.
    pub async fn submit_entry(&self, entry: ScoreEntry) -> Result<(), LeaderboardError> {
        let member = serde_json::to_string(&entry)?;
        self.store
            .zadd(&self.key, &member, entry.score as f64)
            .await?;
        // Unconditional: the removal range is empty while under capacity.
        self.store
            .zrem_range_by_rank(&self.key, 0, -(self.capacity as i64) - 1)
            .await?;
        Ok(())
    }

    /// Up to `n` entries, highest score first. Members that fail to decode
    /// are skipped and logged instead of failing the read.
    pub async fn top_n(&self, n: u64) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        // Counts past i64 range mean "everything"; -1 is the last rank.
        let stop = i64::try_from(n).map_or(-1, |n| n - 1);
        let members = self.store.zrev_range(&self.key, 0, stop).await?;
        let mut entries = Vec::with_capacity(members.len());
        for member in members {
            match serde_json::from_str(&member) {
                Ok(entry) => entries.push(entry),
                Err(e) => log::warn!("skipping malformed member in `{}`: {e}", self.key),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    fn board() -> (Arc<MemoryStore>, BoundedLeaderboard) {
        let store = Arc::new(MemoryStore::new());
        let board = BoundedLeaderboard::new(store.clone(), "scores");
        (store, board)
    }

    fn entry(score: i64, submitted_at: i64) -> ScoreEntry {
        ScoreEntry {
            score,
            submitted_at,
        }
    }

    fn scores(entries: &[ScoreEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.score).collect()
    }

    #[tokio::test]
    async fn top_n_is_descending() {
        let (_, board) = board();
        for score in [10, 50, 30] {
            board.submit(score).await.unwrap();
        }
        let top = board.top_n(10).await.unwrap();
        assert_eq!(scores(&top), vec![50, 30, 10]);
    }

    #[tokio::test]
    async fn top_n_caps_at_requested_length() {
        let (_, board) = board();
        for score in 0..6 {
            board.submit_entry(entry(score, score)).await.unwrap();
        }
        let top = board.top_n(3).await.unwrap();
        assert_eq!(scores(&top), vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn oversized_limits_return_the_whole_board() {
        let (_, board) = board();
        for score in 0..5 {
            board.submit_entry(entry(score, score)).await.unwrap();
        }
        let top = board.top_n(u64::MAX).await.unwrap();
        assert_eq!(scores(&top), vec![4, 3, 2, 1, 0]);

        // First count past i64 range; must not wrap or drop entries.
        let top = board.top_n(i64::MAX as u64 + 1).await.unwrap();
        assert_eq!(scores(&top), vec![4, 3, 2, 1, 0]);

        let top = board.top_n(i64::MAX as u64).await.unwrap();
        assert_eq!(top.len(), 5);
    }

    #[tokio::test]
    async fn top_zero_is_empty() {
        let (_, board) = board();
        board.submit(1).await.unwrap();
        assert!(board.top_n(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overflow_evicts_the_lowest_scores() {
        let store = Arc::new(MemoryStore::new());
        let board = BoundedLeaderboard::with_capacity(store, "scores", 5);
        for score in 0..9 {
            board.submit_entry(entry(score, score)).await.unwrap();
        }
        let top = board.top_n(100).await.unwrap();
        assert_eq!(scores(&top), vec![8, 7, 6, 5, 4]);
    }

    #[tokio::test]
    async fn duplicate_submissions_collapse() {
        let (_, board) = board();
        board.submit_entry(entry(7, 100)).await.unwrap();
        board.submit_entry(entry(7, 100)).await.unwrap();
        assert_eq!(board.top_n(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_score_different_times_both_kept() {
        let (_, board) = board();
        board.submit_entry(entry(7, 100)).await.unwrap();
        board.submit_entry(entry(7, 101)).await.unwrap();
        let top = board.top_n(10).await.unwrap();
        assert_eq!(scores(&top), vec![7, 7]);
    }

    #[tokio::test]
    async fn negative_and_zero_scores_are_accepted() {
        let (_, board) = board();
        for score in [-5, 0, 3] {
            board.submit(score).await.unwrap();
        }
        let top = board.top_n(10).await.unwrap();
        assert_eq!(scores(&top), vec![3, 0, -5]);
    }

    #[tokio::test]
    async fn malformed_members_are_skipped() {
        let (store, board) = board();
        board.submit_entry(entry(10, 100)).await.unwrap();
        store.zadd("scores", "not json", 50.0).await.unwrap();
        board.submit_entry(entry(20, 100)).await.unwrap();

        let top = board.top_n(10).await.unwrap();
        assert_eq!(scores(&top), vec![20, 10]);
    }

    #[tokio::test]
    async fn store_failure_surfaces_from_submit() {
        use async_trait::async_trait;
        use std::time::Duration;

        struct DownStore;

        #[async_trait]
        impl Store for DownStore {
            async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
            async fn set_ex(
                &self,
                _key: &str,
                _value: &str,
                _ttl: Duration,
            ) -> Result<(), StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
            async fn incr(&self, _key: &str) -> Result<i64, StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
            async fn zadd(&self, _key: &str, _member: &str, _score: f64) -> Result<(), StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
            async fn zrem_range_by_rank(
                &self,
                _key: &str,
                _start: i64,
                _stop: i64,
            ) -> Result<u64, StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
            async fn zrev_range(
                &self,
                _key: &str,
                _start: i64,
                _stop: i64,
            ) -> Result<Vec<String>, StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
        }

        let board = BoundedLeaderboard::new(Arc::new(DownStore), "scores");
        assert!(matches!(
            board.submit(1).await,
            Err(LeaderboardError::Store(_))
        ));
        assert!(matches!(
            board.top_n(10).await,
            Err(LeaderboardError::Store(_))
        ));
    }
}
