use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One anonymous score submission.
///
/// Serialized with a fixed field order; the JSON string is also the stored
/// member identity, so two entries with the same score and the same
/// integer-second timestamp collapse into one. Submissions carry no player
/// identity at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub score: i64,
    /// Unix seconds, UTC.
    pub submitted_at: i64,
}

impl ScoreEntry {
    /// Entry for `score` stamped with the current time.
    pub fn new(score: i64) -> Self {
        Self {
            score,
            submitted_at: Utc::now().timestamp(),
        }
    }
}
