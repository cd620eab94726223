//! Riddle content endpoint.
//!
//! The riddle list itself is static configuration data; it still goes
//! through the cache so every instance serves one consistent set and the
//! store stays the single source of truth for what clients last saw.

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::state::AppState;

const RIDDLES_KEY: &str = "riddles";
const RIDDLES_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Riddle {
    pub question: String,
    pub answer: String,
    pub hint: String,
    pub difficulty: String,
}

impl Riddle {
    fn new(question: &str, answer: &str, hint: &str, difficulty: &str) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            hint: hint.into(),
            difficulty: difficulty.into(),
        }
    }
}

/// The shipped riddle set.
pub fn all() -> Vec<Riddle> {
    vec![
        Riddle::new(
            "I am a number that when multiplied by 3 and then divided by 2 gives 9. What am I?",
            "6",
            "Try working backwards from 9",
            "easy",
        ),
        Riddle::new(
            "If you have 12 apples and take away 3, then add 5, and finally divide by 2, how many apples do you have?",
            "7",
            "Follow the operations step by step",
            "easy",
        ),
        Riddle::new(
            "A number is increased by 25% and then decreased by 20%. The final result is 100. What was the original number?",
            "100",
            "Let x be the original number and solve the equation",
            "medium",
        ),
        Riddle::new(
            "If 2^x = 16 and 3^y = 27, what is x + y?",
            "7",
            "Find the values of x and y separately",
            "medium",
        ),
        Riddle::new(
            "The sum of three consecutive even numbers is 54. What is the largest number?",
            "20",
            "Let n be the smallest number and write an equation",
            "hard",
        ),
    ]
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/riddles", get(get_riddles))
}

async fn get_riddles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Riddle>>, (StatusCode, Json<Value>)> {
    match state
        .cache
        .get_or_generate(RIDDLES_KEY, RIDDLES_TTL, || Ok(all()))
        .await
    {
        Ok(riddles) => Ok(Json(riddles)),
        Err(e) => {
            log::error!("riddle fetch failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to process riddles" })),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::{MemoryStore, Store};

    #[tokio::test]
    async fn serves_the_full_set() {
        let state = Arc::new(AppState::new(Arc::new(MemoryStore::new())));
        let riddles = get_riddles(State(state)).await.unwrap().0;
        assert_eq!(riddles.len(), 5);
        assert!(riddles.iter().all(|r| !r.answer.is_empty()));
    }

    #[tokio::test]
    async fn cached_set_is_reused() {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(store.clone()));

        get_riddles(State(state.clone())).await.unwrap();
        let raw = store.get(RIDDLES_KEY).await.unwrap().expect("not cached");
        let cached: Vec<Riddle> = serde_json::from_str(&raw).unwrap();
        assert_eq!(cached, all());
    }

    #[tokio::test]
    async fn stale_cache_entry_is_replaced() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_ex(RIDDLES_KEY, "[{broken", Duration::from_secs(60))
            .await
            .unwrap();

        let state = Arc::new(AppState::new(store));
        let riddles = get_riddles(State(state)).await.unwrap().0;
        assert_eq!(riddles, all());
    }
}
