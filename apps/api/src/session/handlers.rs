use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::advisor::jobs::spawn_effects;
use crate::errors::AppError;
use crate::session::action::Action;
use crate::session::controller::{apply, Context, Effect};
use crate::session::snapshot::SessionSnapshot;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ActionResponse {
    pub session: SessionSnapshot,
    /// Client-side effects of the transition, e.g. `scrollToTop`.
    pub effects: Vec<Effect>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let session = state.sessions.create(Utc::now()).await;
    info!(
        "Created session {} ({} active)",
        session.id,
        state.sessions.len().await
    );
    (
        StatusCode::CREATED,
        Json(SessionSnapshot::build(&session, &state.catalog)),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionSnapshot::build(&session, &state.catalog)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    info!("Deleted session {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/actions
pub async fn handle_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(action): Json<Action>,
) -> Result<Json<ActionResponse>, AppError> {
    dispatch(&state, id, action).await.map(Json)
}

/// Applies one action under the session lock, stores the new state and
/// starts whatever AI work the transition requested.
pub(crate) async fn dispatch(
    state: &AppState,
    id: Uuid,
    action: Action,
) -> Result<ActionResponse, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let ctx = Context {
        catalog: &state.catalog,
        logout: state.config.logout,
        now: Utc::now(),
    };

    let name = action.name();
    let transition = apply(&session, action, &ctx).map_err(|e| {
        warn!("Session {id}: rejected {name}: {e}");
        e
    })?;
    *session = transition.state;
    debug!("Session {id}: {name} -> {:?}", session.view);

    spawn_effects(&state.advisor, &handle, id, &transition.effects);
    Ok(ActionResponse {
        session: SessionSnapshot::build(&session, &state.catalog),
        effects: transition.effects,
    })
}
