//! Runs the AI requests a transition asked for. Each request is a detached
//! task that calls the advisor, then re-locks the session and commits the
//! result through the panel ticket it was issued. A session that moved on in
//! the meantime rejects the commit as stale.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::advisor::{Advisor, AdvisorError};
use crate::session::controller::Effect;
use crate::session::panel::{AiPanel, CommitOutcome, Ticket};
use crate::session::store::SessionHandle;

/// Spawns one task per AI effect. UI-only effects are skipped.
pub fn spawn_effects(
    advisor: &Arc<Advisor>,
    session: &SessionHandle,
    session_id: Uuid,
    effects: &[Effect],
) -> Vec<JoinHandle<()>> {
    effects
        .iter()
        .filter_map(|effect| {
            let advisor = Arc::clone(advisor);
            let session = Arc::clone(session);
            let task = match effect.clone() {
                Effect::ScrollToTop => return None,
                Effect::AnalyzeComparison { ticket, ids, lang } => tokio::spawn(async move {
                    let result = advisor.compare(&ids, lang).await;
                    let mut state = session.lock().await;
                    commit("comparison", session_id, &mut state.comparison_panel, ticket, result);
                }),
                Effect::AnalyzeGuidance {
                    ticket,
                    profile,
                    lang,
                } => tokio::spawn(async move {
                    let result = advisor.guidance(&profile, lang).await;
                    let mut state = session.lock().await;
                    commit("guidance", session_id, &mut state.guidance_panel, ticket, result);
                }),
                Effect::AnalyzePortfolio {
                    ticket,
                    student,
                    lang,
                } => tokio::spawn(async move {
                    let result = advisor.analyze_portfolio(&student, lang).await;
                    let mut state = session.lock().await;
                    commit("portfolio", session_id, &mut state.profile_panel, ticket, result);
                }),
            };
            Some(task)
        })
        .collect()
}

fn commit<T>(
    kind: &str,
    session_id: Uuid,
    panel: &mut AiPanel<T>,
    ticket: Ticket,
    result: Result<T, AdvisorError>,
) {
    if let Err(e) = &result {
        warn!("{kind} analysis failed for session {session_id}: {e}");
    }
    match panel.commit(ticket, result) {
        CommitOutcome::Applied => info!("{kind} analysis committed for session {session_id}"),
        CommitOutcome::Stale => info!(
            "Discarded stale {kind} response for session {session_id} (generation {})",
            ticket.generation
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::sync::Mutex;

    use super::*;
    use crate::advisor::tests::{advisor, StubModel, COMPARISON_JSON};
    use crate::session::panel::PanelStatus;
    use crate::session::state::SessionState;

    fn comparing(ids: &[&str]) -> (SessionHandle, Ticket) {
        let mut state = SessionState::new(Uuid::new_v4(), Utc::now());
        state.comparison = ids.iter().map(|s| s.to_string()).collect();
        let ticket = state.comparison_panel.begin(ids.join(","));
        (Arc::new(Mutex::new(state)), ticket)
    }

    fn compare_effect(ticket: Ticket, ids: &[&str]) -> Effect {
        Effect::AnalyzeComparison {
            ticket,
            ids: ids.iter().map(|s| s.to_string()).collect(),
            lang: crate::i18n::Language::Ru,
        }
    }

    #[tokio::test]
    async fn test_comparison_result_is_committed() {
        let model = Arc::new(StubModel::with_replies(vec![Ok(COMPARISON_JSON.into())]));
        let advisor = Arc::new(advisor(model, false));
        let (session, ticket) = comparing(&["nu", "kbtu"]);

        let effects = [Effect::ScrollToTop, compare_effect(ticket, &["nu", "kbtu"])];
        let tasks = spawn_effects(&advisor, &session, Uuid::new_v4(), &effects);
        assert_eq!(tasks.len(), 1);
        for task in tasks {
            task.await.unwrap();
        }

        let state = session.lock().await;
        assert_eq!(state.comparison_panel.status(), PanelStatus::Ready);
        assert!(state.comparison_panel.data().is_some());
    }

    #[tokio::test]
    async fn test_unparseable_reply_leaves_retry() {
        let model = Arc::new(StubModel::with_replies(vec![Ok("Извините, не могу.".into())]));
        let advisor = Arc::new(advisor(model, false));
        let (session, ticket) = comparing(&["nu", "kbtu"]);

        let effects = [compare_effect(ticket, &["nu", "kbtu"])];
        for task in spawn_effects(&advisor, &session, Uuid::new_v4(), &effects) {
            task.await.unwrap();
        }

        let state = session.lock().await;
        assert!(state.comparison_panel.data().is_none());
        assert!(!state.comparison_panel.is_loading());
        assert!(state.comparison_panel.retry_available());
    }

    #[tokio::test]
    async fn test_superseded_request_is_discarded() {
        let model = Arc::new(StubModel::with_replies(vec![Ok(COMPARISON_JSON.into())]));
        let advisor = Arc::new(advisor(model, false));
        let (session, ticket) = comparing(&["nu", "kbtu"]);
        session.lock().await.comparison_panel.invalidate();

        let effects = [compare_effect(ticket, &["nu", "kbtu"])];
        for task in spawn_effects(&advisor, &session, Uuid::new_v4(), &effects) {
            task.await.unwrap();
        }

        let state = session.lock().await;
        assert_eq!(state.comparison_panel.status(), PanelStatus::Idle);
        assert!(state.comparison_panel.data().is_none());
    }
}
