//! Client-facing HTTP surface
//!
//! Axum router over the coaching orchestrator:
//!   POST /coaching/daily-advice
//!   POST /coaching/weekly-report
//!   POST /coaching/motivation
//!   POST /coaching/feedback
//!   POST /coaching/session-summary
//!   GET  /coaching/health          (no auth)

pub mod auth;
pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::coach::{CoachOrchestrator, FeedbackRecorder};
use crate::context::IdentityVerifier;

pub use error::ApiError;

/// Shared wiring handed to every handler. Immutable after startup; request
/// handling itself keeps no state.
pub struct AppContext {
    pub orchestrator: Arc<CoachOrchestrator>,
    pub recorder: FeedbackRecorder,
    pub identity: Arc<dyn IdentityVerifier>,
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/coaching/health", get(routes::health))
        // Coaching operations (bearer credential required)
        .route("/coaching/daily-advice", post(routes::daily_advice))
        .route("/coaching/weekly-report", post(routes::weekly_report))
        .route("/coaching/motivation", post(routes::motivation))
        .route("/coaching/feedback", post(routes::feedback))
        .route("/coaching/session-summary", post(routes::session_summary))
        .with_state(ctx)
}

pub async fn serve(ctx: Arc<AppContext>, addr: SocketAddr) -> Result<()> {
    let router = build_router(ctx);

    info!("coaching API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
