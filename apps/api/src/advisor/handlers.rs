use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::action::Action;
use crate::session::controller::{begin_chat, finish_chat};
use crate::session::handlers::{dispatch, ActionResponse};
use crate::session::snapshot::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// POST /api/v1/sessions/:id/chat
///
/// Waits for the reply. The exchange runs in its own task so the busy flag is
/// cleared even if the client goes away mid-request.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let (ticket, lang) = {
        let mut session = handle.lock().await;
        let ticket = begin_chat(&mut session, &req.message)?;
        session.updated_at = Utc::now();
        (ticket, session.lang)
    };

    let exchange = tokio::spawn(async move {
        let reply = state.advisor.chat(req.message.trim(), lang).await;
        let mut session = handle.lock().await;
        if !finish_chat(&mut session, ticket, reply) {
            info!("Dropped chat reply for session {id}: transcript was reset");
        }
        SessionSnapshot::build(&session, &state.catalog)
    });
    let snapshot = exchange
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/compare/analyze
pub async fn handle_analyze_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    dispatch(&state, id, Action::AnalyzeComparison).await.map(Json)
}

/// POST /api/v1/sessions/:id/guidance/analyze
pub async fn handle_analyze_guidance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    dispatch(&state, id, Action::AnalyzeGuidance).await.map(Json)
}

/// POST /api/v1/sessions/:id/profile/analyze
pub async fn handle_analyze_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    dispatch(&state, id, Action::AnalyzePortfolio).await.map(Json)
}
