//! HTTP server lifecycle and the idle-session sweeper.

use crate::api;
use crate::config::ServerConfig;
use crate::store::SessionStore;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Serves the REST interface until Ctrl-C.
#[instrument(skip(config), fields(addr = %config.bind_address()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = SessionStore::new(config.store_settings());
    let sweeper = spawn_sweeper(store.clone(), config.sweep_interval());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, api::router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

/// Evicts idle sessions every `every`.
pub fn spawn_sweeper(store: SessionStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(Utc::now());
            debug!(evicted, remaining = store.len(), "Idle sweep");
        }
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
