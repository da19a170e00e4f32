//! Loading/error/success sub-state for one AI-backed screen.
//!
//! Every request is issued a [`Ticket`] carrying the panel's generation at
//! dispatch time. Starting a new request, leaving the owning view or logging
//! out bumps the generation, so a response that arrives late no longer
//! matches and is dropped instead of overwriting newer state.

use serde::{Deserialize, Serialize};

use crate::i18n::{t, Language, Message};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
pub struct AiPanel<T> {
    status: PanelStatus,
    data: Option<T>,
    generation: u64,
    /// Serialized request input of the latest dispatch.
    input_key: Option<String>,
}

impl<T> Default for AiPanel<T> {
    fn default() -> Self {
        Self {
            status: PanelStatus::Idle,
            data: None,
            generation: 0,
            input_key: None,
        }
    }
}

impl<T> AiPanel<T> {
    pub fn status(&self) -> PanelStatus {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == PanelStatus::Loading
    }

    /// Failed requests are retried by the user, never automatically.
    pub fn retry_available(&self) -> bool {
        self.status == PanelStatus::Failed
    }

    /// True when a request for `key` is in flight, has succeeded, or has
    /// failed and is waiting for a manual retry.
    pub fn attempted(&self, key: &str) -> bool {
        self.input_key.as_deref() == Some(key) && self.status != PanelStatus::Idle
    }

    /// Marks a new request in flight. Data from a different input is dropped;
    /// data for the same input stays visible until replaced.
    pub fn begin(&mut self, key: String) -> Ticket {
        self.generation += 1;
        if self.input_key.as_deref() != Some(key.as_str()) {
            self.data = None;
        }
        self.input_key = Some(key);
        self.status = PanelStatus::Loading;
        Ticket {
            generation: self.generation,
        }
    }

    /// Applies a finished request if its ticket is still current.
    pub fn commit<E>(&mut self, ticket: Ticket, result: Result<T, E>) -> CommitOutcome {
        if ticket.generation != self.generation || self.status != PanelStatus::Loading {
            return CommitOutcome::Stale;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = PanelStatus::Ready;
            }
            Err(_) => {
                self.data = None;
                self.status = PanelStatus::Failed;
            }
        }
        CommitOutcome::Applied
    }

    /// Abandons an in-flight request. Loaded data is kept.
    pub fn invalidate(&mut self) {
        if self.status == PanelStatus::Loading {
            self.generation += 1;
            self.status = PanelStatus::Idle;
            self.input_key = None;
        }
    }

    /// Forgets everything except the generation counter, which must keep
    /// growing so old tickets can never match again.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = PanelStatus::Idle;
        self.data = None;
        self.input_key = None;
    }
}

/// Serializable view of a panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView<T> {
    pub status: PanelStatus,
    pub data: Option<T>,
    pub retry_available: bool,
    /// Localized notice shown next to the retry control.
    pub error: Option<&'static str>,
}

impl<T: Clone> PanelView<T> {
    pub fn new(panel: &AiPanel<T>, lang: Language) -> Self {
        Self {
            status: panel.status,
            data: panel.data.clone(),
            retry_available: panel.retry_available(),
            error: panel
                .retry_available()
                .then(|| t(lang, Message::AnalysisFailed)),
        }
    }
}
