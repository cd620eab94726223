//! Score submission and leaderboard reads for the blitz minigame.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use once_cell::sync::Lazy;
use prometheus::{IntCounter, register_int_counter};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::state::AppState;

/// Sorted set holding the blitz board.
pub(crate) const SCORES_KEY: &str = "blitz_scores";

/// Entries returned when the caller does not ask for a specific count.
const DEFAULT_LIMIT: u64 = 10;

static SCORE_SUBMISSIONS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blitz_score_submissions_total",
        "Blitz scores accepted onto the board"
    )
    .unwrap()
});

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/score", post(submit_score))
        .route("/leaderboard", get(get_leaderboard))
}

#[derive(Deserialize)]
struct ScoreBody {
    score: i64,
}

async fn submit_score(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScoreBody>,
) -> (StatusCode, Json<Value>) {
    match state.leaderboard.submit(body.score).await {
        Ok(()) => {
            SCORE_SUBMISSIONS.inc();
            (
                StatusCode::OK,
                Json(json!({ "message": "Score saved successfully" })),
            )
        }
        Err(e) => {
            log::error!("blitz score submission failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save score" })),
            )
        }
    }
}

#[derive(Deserialize)]
struct LeaderboardParams {
    limit: Option<u64>,
}

async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> (StatusCode, Json<Value>) {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    match state.leaderboard.top_n(limit).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "leaderboard": entries }))),
        Err(e) => {
            log::error!("blitz leaderboard read failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch leaderboard" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn submit_then_read_back() {
        let state = state();
        for score in [5, 25, 15] {
            let (status, _) =
                submit_score(State(state.clone()), Json(ScoreBody { score })).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, Json(body)) =
            get_leaderboard(State(state), Query(LeaderboardParams { limit: None })).await;
        assert_eq!(status, StatusCode::OK);

        let entries = body["leaderboard"].as_array().unwrap();
        let scores: Vec<i64> = entries
            .iter()
            .map(|e| e["score"].as_i64().unwrap())
            .collect();
        assert_eq!(scores, vec![25, 15, 5]);
        assert!(entries.iter().all(|e| e["submittedAt"].is_i64()));
    }

    #[tokio::test]
    async fn limit_parameter_caps_the_read() {
        let state = state();
        for score in 0..20 {
            submit_score(State(state.clone()), Json(ScoreBody { score }))
                .await;
        }

        let (_, Json(body)) = get_leaderboard(
            State(state.clone()),
            Query(LeaderboardParams { limit: Some(3) }),
        )
        .await;
        assert_eq!(body["leaderboard"].as_array().unwrap().len(), 3);

        // Default read returns ten.
        let (_, Json(body)) =
            get_leaderboard(State(state), Query(LeaderboardParams { limit: None })).await;
        assert_eq!(body["leaderboard"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn empty_board_reads_as_empty_list() {
        let (status, Json(body)) =
            get_leaderboard(State(state()), Query(LeaderboardParams { limit: None })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["leaderboard"].as_array().unwrap().len(), 0);
    }
}
