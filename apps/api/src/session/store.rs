//! In-memory session registry. Each session sits behind its own mutex so a
//! transition, an AI commit and a read never interleave on one session while
//! different sessions proceed independently. Nothing survives a restart.
//!
//! A reload in the browser starts a new session, so abandoned ones are swept
//! once they have been idle longer than the configured TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::state::SessionState;

pub type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, now: DateTime<Utc>) -> SessionState {
        let state = SessionState::new(Uuid::new_v4(), now);
        self.sessions
            .write()
            .await
            .insert(state.id, Arc::new(Mutex::new(state.clone())));
        state
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops the session. In-flight AI jobs keep their handle and finish
    /// against a state nobody can read anymore.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions whose last change is older than `ttl`. A session that
    /// is locked right now is in use and stays.
    pub async fn evict_idle(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> usize {
        let cutoff = now - ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.updated_at >= cutoff,
            Err(_) => true,
        });
        before - sessions.len()
    }

    /// Runs `evict_idle` every `every` for the life of the process.
    pub fn spawn_sweeper(&self, ttl: chrono::Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(Utc::now(), ttl).await;
                if evicted > 0 {
                    info!(
                        "Evicted {evicted} idle sessions ({} active)",
                        store.len().await
                    );
                }
            }
        })
    }
}
