//! meterwire-server
//!
//! Serves the demo instrumented resource with metrics bound from its
//! declarations, plus `/healthz`, `/metrics` and `/metrics/json`.
//! Config path: first argument, default `meterwire.yaml`.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use meterwire_core::{MeterwireError, Result};
use meterwire_server::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "meterwire.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|e| MeterwireError::BadRequest(format!("server.listen: {e}")))?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state)?;

    tracing::info!(%listen, "meterwire-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MeterwireError::Internal(format!("failed to bind: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| MeterwireError::Internal(format!("server failed: {e}")))
}
