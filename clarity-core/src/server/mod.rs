//! HTTP API: routes, shared state and the listening server.

pub mod auth;
pub mod dashboard;
pub mod extract;
pub mod speech;

#[cfg(test)]
pub(crate) mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::TokenIssuer;
use crate::speech::{AccentDetector, PronunciationAssessor, SpeechPipeline};
use crate::store::Store;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub pipeline: Arc<SpeechPipeline>,
    pub tokens: Arc<TokenIssuer>,
    /// Identity for requests without a valid bearer token.
    pub demo_email: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        assessor: Arc<dyn PronunciationAssessor>,
        accent: Arc<dyn AccentDetector>,
        tokens: TokenIssuer,
        demo_email: impl Into<String>,
    ) -> Self {
        let pipeline = SpeechPipeline::new(assessor, accent, store.clone());
        Self {
            store,
            pipeline: Arc::new(pipeline),
            tokens: Arc::new(tokens),
            demo_email: demo_email.into(),
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/speech/analyze", post(speech::analyze_speech))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/health", get(dashboard::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Listening HTTP server for the API.
pub struct ApiServer {
    addr: SocketAddr,
    app: Router,
}

impl ApiServer {
    pub fn new(addr: SocketAddr, state: AppState, max_upload_bytes: usize) -> Self {
        Self {
            addr,
            app: router(state, max_upload_bytes),
        }
    }

    /// Serve until Ctrl+C.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "API server listening");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
