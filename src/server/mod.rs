//! REST front end for the summarizer.
//!
//! Exposes the controller over HTTP:
//! - `POST /api/summarize` for documents already on disk
//! - `POST /api/summarize/upload` for multipart uploads
//! - `GET /api/health` and `GET /` for probes and discovery

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::controller::SummarizerController;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SummarizerController>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            controller: Arc::new(SummarizerController::new(settings)),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: Arc<Settings>, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
