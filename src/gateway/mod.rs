//! The HTTP front end: `POST /api/chat` over axum.
//!
//! Every request starts its own engine handle; the only thing shared
//! between requests is the factory in [`AppState`].

pub mod error;
pub mod handlers;
pub mod routes;

use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::engine::EngineFactory;

pub use error::ApiError;
pub use routes::create_router;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engines: Arc<dyn EngineFactory>,
}

impl AppState {
    pub fn new(engines: Arc<dyn EngineFactory>) -> Self {
        Self { engines }
    }
}

/// Open the listener. Failing here is fatal for the process.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))
}

/// Serve requests on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("listener has no address")?;
    let info = state.engines.describe();
    tracing::info!(
        provider = %info.provider,
        model = %info.model,
        "Server starting on {}",
        addr
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
