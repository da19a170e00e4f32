pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::catalog::handlers as catalog;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API (stateless)
        .route("/api/v1/catalog/options", get(catalog::handle_options))
        .route("/api/v1/universities", get(catalog::handle_list_universities))
        .route("/api/v1/universities/:id", get(catalog::handle_get_university))
        .route("/api/v1/professions", get(catalog::handle_list_professions))
        .route("/api/v1/professions/:id", get(catalog::handle_get_profession))
        .route("/api/v1/suggestions", get(catalog::handle_suggestions))
        // Session API (view-state controller)
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/actions", post(session::handle_action))
        // AI Gateway
        .route("/api/v1/sessions/:id/chat", post(advisor::handle_chat))
        .route(
            "/api/v1/sessions/:id/compare/analyze",
            post(advisor::handle_analyze_comparison),
        )
        .route(
            "/api/v1/sessions/:id/guidance/analyze",
            post(advisor::handle_analyze_guidance),
        )
        .route(
            "/api/v1/sessions/:id/profile/analyze",
            post(advisor::handle_analyze_portfolio),
        )
        .with_state(state)
}
