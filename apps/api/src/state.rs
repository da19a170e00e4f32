use std::sync::Arc;

use crate::advisor::Advisor;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable dataset, loaded once at startup.
    pub catalog: Arc<Catalog>,
    pub sessions: SessionStore,
    pub advisor: Arc<Advisor>,
    pub config: Config,
}
