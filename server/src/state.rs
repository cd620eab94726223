use std::sync::Arc;

use leaderboard::BoundedLeaderboard;
use storage::{DailyTally, Store, TtlCache};

/// Shared handles behind every route.
///
/// The components are stateless adapters over the one injected [`Store`];
/// swapping the store (Redis in production, in-process in tests) swaps the
/// whole backend.
pub struct AppState {
    pub leaderboard: BoundedLeaderboard,
    pub cache: TtlCache,
    pub tally: DailyTally,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            leaderboard: BoundedLeaderboard::new(store.clone(), crate::blitz::SCORES_KEY),
            cache: TtlCache::new(store.clone()),
            tally: DailyTally::new(store),
        }
    }
}
