//! Goalkeeper server.
//!
//! - REST endpoints: GET/POST /goals, DELETE /goals/:id
//! - Ops endpoints: /metrics (Prometheus text), /healthz
//! - Access log appended to `logs/access.log`
//!
//! Environment, after `.env` is loaded: `PORT` (default 3000), `MONGO_URL`
//! (required), `GOALKEEPER_CONFIG` (optional YAML file), `RUST_LOG`.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use goalkeeper_core::error::{GoalError, Result};
use goalkeeper_server::{
    app_state::AppState,
    config,
    obs::AccessLog,
    router,
    store::{GoalStore, MongoGoalStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "goalkeeper-server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    match config::load_dotenv() {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, ".env ignored"),
    }

    // Missing MONGO_URL fails here, before any connection attempt.
    let cfg = config::load()?;
    let listen = cfg.server.socket_addr()?;

    let store = Arc::new(MongoGoalStore::connect(&cfg.store).await?);
    let access_log = AccessLog::open(&cfg.access_log.path).await?;

    let state = AppState::new(store.clone(), access_log);
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| GoalError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "goalkeeper-server listening");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    store.close().await;
    served.map_err(|e| GoalError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
