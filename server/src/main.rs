use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use server::state::AppState;
use server::{Cli, app};
use storage::{MemoryStore, RedisStore, Store};

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store: Arc<dyn Store> = if cli.memory_store {
        log::warn!("using the in-process store; state will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        let timeout = Duration::from_millis(cli.store_timeout_ms);
        Arc::new(RedisStore::connect(&cli.redis_url, timeout).await?)
    };

    let state = Arc::new(AppState::new(store));
    let router = app(state, &cli)?;

    let listener = tokio::net::TcpListener::bind(cli.listen_addr).await?;
    log::info!("listening on {}", cli.listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("server exiting");
    Ok(())
}
