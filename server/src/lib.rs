//! HTTP transport for the arcade mini-game backend.
//!
//! Every route maps to exactly one operation on one component from the
//! `storage`, `leaderboard` or `runner` crates; the router holds no game
//! logic of its own. State lives entirely in the injected store.

pub mod blitz;
pub mod course;
pub mod metrics;
pub mod riddles;
pub mod state;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{ACCEPT, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, get_service};
use axum::{Json, Router};
use clap::Parser;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

/// Command line / environment configuration. Every flag can also be set
/// through an `ARCADE_*` variable; flags win over the environment.
#[derive(Parser, Debug)]
#[command(name = "arcade-server", about = "Backend for the arcade mini-games")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "ARCADE_LISTEN_ADDR", default_value = "0.0.0.0:8081")]
    pub listen_addr: std::net::SocketAddr,

    /// Redis connection URL.
    #[arg(long, env = "ARCADE_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Deadline for a single store round trip, in milliseconds.
    #[arg(long, env = "ARCADE_STORE_TIMEOUT_MS", default_value_t = 2_000)]
    pub store_timeout_ms: u64,

    /// Origin allowed by the CORS policy.
    #[arg(long, env = "ARCADE_ALLOWED_ORIGIN", default_value = "http://localhost:8080")]
    pub allowed_origin: String,

    /// Directory served under /static.
    #[arg(long, env = "ARCADE_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Run against an in-process store instead of Redis. State does not
    /// survive a restart; meant for local development and tests.
    #[arg(long, env = "ARCADE_MEMORY_STORE", default_value_t = false)]
    pub memory_store: bool,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Assemble the full application router.
///
/// Fails only if `allowed_origin` is not a valid header value; every other
/// input is taken as-is.
pub fn app(state: Arc<AppState>, cli: &Cli) -> anyhow::Result<Router> {
    let origin: HeaderValue = cli
        .allowed_origin
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid allowed origin `{}`", cli.allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT])
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60));

    let static_service = get_service(ServeDir::new(&cli.static_dir)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ),
    );

    let api = Router::new()
        .merge(riddles::routes())
        .nest("/runner", course::routes())
        .nest("/blitz", blitz::routes());

    Ok(Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .route("/metrics", get(metrics::render))
        .nest_service("/static", static_service)
        .layer(cors)
        .with_state(state))
}
