//! Coaching API route handlers
//!
//! One handler per orchestrator operation. Each non-health route resolves
//! the bearer credential first; the user id never comes from the request
//! body.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::http::auth::authenticate;
use crate::http::error::ApiError;
use crate::http::AppContext;
use crate::types::{
    AdviceType, AlternativeTechnique, DailyAdvice, Motivation, MotivationTrigger, SessionSummary,
    WeeklyReport,
};

#[derive(Debug, Deserialize)]
pub struct DailyAdviceRequest {
    /// Optional focus for today, echoed into the prompt
    pub extra_context: Option<String>,
}

pub async fn daily_advice(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<DailyAdviceRequest>,
) -> Result<Json<DailyAdvice>, ApiError> {
    let user_id = authenticate(ctx.identity.as_ref(), &headers).await?;
    let advice = ctx
        .orchestrator
        .daily_advice(user_id, body.extra_context.as_deref())
        .await?;
    Ok(Json(advice))
}

#[derive(Debug, Deserialize)]
pub struct WeeklyReportRequest {
    /// Trailing window in days, 3–30, default 7
    pub days: Option<u32>,
}

pub async fn weekly_report(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<WeeklyReportRequest>,
) -> Result<Json<WeeklyReport>, ApiError> {
    let user_id = authenticate(ctx.identity.as_ref(), &headers).await?;
    let report = ctx.orchestrator.weekly_report(user_id, body.days).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct MotivationRequest {
    #[serde(default)]
    pub trigger: MotivationTrigger,
    pub user_note: Option<String>,
}

pub async fn motivation(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<MotivationRequest>,
) -> Result<Json<Motivation>, ApiError> {
    let user_id = authenticate(ctx.identity.as_ref(), &headers).await?;
    let motivation = ctx
        .orchestrator
        .motivation(user_id, body.trigger, body.user_note.as_deref())
        .await?;
    Ok(Json(motivation))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub technique: String,
    pub liked: bool,
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub advice_type: AdviceType,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
    pub feedback_id: uuid::Uuid,
    pub alternative: Option<AlternativeTechnique>,
}

pub async fn feedback(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let user_id = authenticate(ctx.identity.as_ref(), &headers).await?;
    let outcome = ctx
        .recorder
        .record(
            user_id,
            &body.technique,
            body.liked,
            body.rejection_reason.as_deref(),
            body.advice_type,
        )
        .await?;
    Ok(Json(FeedbackResponse {
        success: outcome.success,
        message: outcome.message,
        feedback_id: outcome.feedback_id,
        alternative: outcome.alternative,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SessionSummaryRequest {
    pub session_id: i64,
}

pub async fn session_summary(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<SessionSummaryRequest>,
) -> Result<Json<SessionSummary>, ApiError> {
    let user_id = authenticate(ctx.identity.as_ref(), &headers).await?;
    let summary = ctx
        .orchestrator
        .session_summary(user_id, body.session_id)
        .await?;
    Ok(Json(summary))
}

/// Model-endpoint health probe; the only unauthenticated route
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let report = ctx.orchestrator.health().await;
    Json(json!({
        "status": if report.healthy { "healthy" } else { "unhealthy" },
        "model": report.model,
        "error": report.error,
        "checked_at": report.checked_at,
    }))
}
