use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::error::StoreError;
use crate::Store;

/// Per-day activity counter, one store key per game per UTC calendar day.
///
/// The increment is a single atomic round trip, so concurrent submissions
/// never lose counts. Keys roll over at UTC midnight; nothing expires them,
/// history stays queryable out of band.
#[derive(Clone)]
pub struct DailyTally {
    store: Arc<dyn Store>,
}

impl DailyTally {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Count one event for `game` against today's UTC tally. Returns the
    /// day's running total.
    pub async fn increment(&self, game: &str) -> Result<i64, StoreError> {
        self.increment_on(game, Utc::now().date_naive()).await
    }

    /// Count one event against an explicit calendar day. `increment` is the
    /// production path; this layer pins the day for deterministic tests.
    pub async fn increment_on(&self, game: &str, day: NaiveDate) -> Result<i64, StoreError> {
        self.store.incr(&day_key(game, day)).await
    }
}

/// Tally key for `game` on `day`, e.g. `runner_score:20260823`.
pub fn day_key(game: &str, day: NaiveDate) -> String {
    format!("{game}:{}", day.format("%Y%m%d"))
}
