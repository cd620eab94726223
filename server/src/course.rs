//! Obstacle course and daily run tally for the runner minigame.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use once_cell::sync::Lazy;
use prometheus::{IntCounter, register_int_counter};
use serde::Deserialize;
use serde_json::{Value, json};

use runner::Obstacle;

use crate::state::AppState;

/// Cache key for the shared obstacle course.
const COURSE_KEY: &str = "runner_obstacles";
/// Tally namespace; the UTC day is appended per increment.
const TALLY_GAME: &str = "runner_score";
/// One course is shared between players until it expires.
const COURSE_TTL: Duration = Duration::from_secs(5 * 60);

static RUNS_RECORDED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("runner_runs_recorded_total", "Runner score submissions").unwrap()
});

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/obstacles", get(get_obstacles))
        .route("/score", post(record_run))
}

async fn get_obstacles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Obstacle>>, (StatusCode, Json<Value>)> {
    match state
        .cache
        .get_or_generate(COURSE_KEY, COURSE_TTL, || Ok(runner::generate()))
        .await
    {
        Ok(course) => Ok(Json(course)),
        Err(e) => {
            log::error!("obstacle course fetch failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate problems" })),
            ))
        }
    }
}

#[derive(Deserialize)]
struct RunBody {
    /// Clients report their run score, but only the fact of the run is
    /// tallied; the value itself is not retained.
    #[allow(dead_code)]
    score: Option<i64>,
}

async fn record_run(
    State(state): State<Arc<AppState>>,
    Json(_body): Json<RunBody>,
) -> (StatusCode, Json<Value>) {
    match state.tally.increment(TALLY_GAME).await {
        Ok(total) => {
            RUNS_RECORDED.inc();
            log::debug!("runner tally for today now {total}");
            (
                StatusCode::OK,
                Json(json!({ "message": "Score saved successfully" })),
            )
        }
        Err(e) => {
            log::error!("runner tally increment failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save score" })),
            )
        }
    }
}
