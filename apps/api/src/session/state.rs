use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisor::schema::{ComparisonReport, ProfileReport, TwinReport};
use crate::catalog::filter::{ProfessionFilter, UniversityFilter};
use crate::i18n::{t, Language, Message};
use crate::models::{ProgramLanguage, Review, StudentProfile, UniversityCategory, UserProfile};
use crate::session::panel::{AiPanel, Ticket};
use crate::session::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Guest,
    Google,
    Email,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    pub method: LoginMethod,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    /// Set while a reply is outstanding; a second send is refused.
    pub busy: bool,
    generation: u64,
}

impl ChatState {
    pub fn new(lang: Language) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Model,
                text: t(lang, Message::ChatGreeting).to_string(),
            }],
            busy: false,
            generation: 0,
        }
    }

    pub(crate) fn begin(&mut self, text: String) -> Ticket {
        self.generation += 1;
        self.busy = true;
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text,
        });
        Ticket {
            generation: self.generation,
        }
    }

    /// Appends the reply unless the transcript was reset meanwhile.
    pub(crate) fn finish(&mut self, ticket: Ticket, reply: String) -> bool {
        if !self.busy || ticket.generation != self.generation {
            return false;
        }
        self.busy = false;
        self.messages.push(ChatMessage {
            role: ChatRole::Model,
            text: reply,
        });
        true
    }

    pub(crate) fn reset(&mut self, lang: Language) {
        let generation = self.generation + 1;
        *self = Self::new(lang);
        self.generation = generation;
    }
}

/// Everything one browser session knows. Owned by the session store and only
/// ever replaced wholesale by a controller transition.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: Uuid,
    pub auth: Option<AuthInfo>,
    pub view: View,
    pub lang: Language,

    pub selected_university: Option<String>,
    pub selected_profession: Option<String>,

    /// Insertion-ordered; display order of the comparison view.
    pub comparison: Vec<String>,
    pub saved: Vec<String>,

    pub search: String,
    pub city: Option<String>,
    pub category: Option<UniversityCategory>,
    pub program_language: Option<ProgramLanguage>,
    pub saved_only: bool,
    pub profession_category: Option<String>,
    /// 1-based; always within the active list's page range.
    pub page: usize,

    pub quiz_profile: Option<UserProfile>,
    pub student: Option<StudentProfile>,
    /// Client-side reviews keyed by university id, newest first.
    pub reviews: HashMap<String, Vec<Review>>,
    pub chat: ChatState,

    pub comparison_panel: AiPanel<ComparisonReport>,
    pub guidance_panel: AiPanel<TwinReport>,
    pub profile_panel: AiPanel<ProfileReport>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        let lang = Language::default();
        Self {
            id,
            auth: None,
            view: View::Landing,
            lang,
            selected_university: None,
            selected_profession: None,
            comparison: Vec::new(),
            saved: Vec::new(),
            search: String::new(),
            city: None,
            category: None,
            program_language: None,
            saved_only: false,
            profession_category: None,
            page: 1,
            quiz_profile: None,
            student: None,
            reviews: HashMap::new(),
            chat: ChatState::new(lang),
            comparison_panel: AiPanel::default(),
            guidance_panel: AiPanel::default(),
            profile_panel: AiPanel::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn university_filter(&self) -> UniversityFilter {
        UniversityFilter {
            search: self.search.clone(),
            city: self.city.clone(),
            category: self.category,
            language: self.program_language,
            saved_only: self.saved_only,
        }
    }

    pub fn profession_filter(&self) -> ProfessionFilter {
        ProfessionFilter {
            search: self.search.clone(),
            category: self.profession_category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_on_landing() {
        let state = SessionState::new(Uuid::new_v4(), Utc::now());
        assert_eq!(state.view, View::Landing);
        assert!(!state.is_authenticated());
        assert_eq!(state.page, 1);
        assert_eq!(state.chat.messages.len(), 1);
        assert_eq!(state.chat.messages[0].role, ChatRole::Model);
    }

    #[test]
    fn test_chat_finish_after_reset_is_dropped() {
        let mut chat = ChatState::new(Language::Ru);
        let ticket = chat.begin("привет".into());
        assert!(chat.busy);
        chat.reset(Language::Ru);
        assert!(!chat.finish(ticket, "ответ".into()));
        assert_eq!(chat.messages.len(), 1);
        assert!(!chat.busy);
    }

    #[test]
    fn test_chat_round_trip_appends_reply() {
        let mut chat = ChatState::new(Language::En);
        let ticket = chat.begin("hello".into());
        assert!(chat.finish(ticket, "hi!".into()));
        assert_eq!(chat.messages.len(), 3);
        assert_eq!(chat.messages[2].text, "hi!");
        assert!(!chat.busy);
    }
}
