//! User actions accepted by the controller. One variant per user-facing
//! event; the wire form is `{"type": "<camelCaseName>", ...fields}` with
//! structured payloads nested under their own key.

use serde::Deserialize;

use crate::catalog::filter::all_as_none;
use crate::catalog::suggestions::SuggestionKind;
use crate::i18n::Language;
use crate::models::{AchievementCategory, ProgramLanguage, ReviewRole, UniversityCategory};
use crate::session::quiz::QuizSubmission;
use crate::session::state::LoginMethod;
use crate::session::view::NavTarget;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    Login {
        method: LoginMethod,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
    Logout,
    Navigate {
        to: NavTarget,
    },
    /// Header heart button: flips saved-only mode and shows the home list.
    ToggleFavorites,
    Back,
    SelectUniversity {
        id: String,
    },
    SelectProfession {
        id: String,
    },
    ToggleComparison {
        id: String,
    },
    ToggleSaved {
        id: String,
    },
    SetSearch {
        term: String,
    },
    ApplySuggestion {
        text: String,
        kind: SuggestionKind,
    },
    SetCityFilter {
        #[serde(default, deserialize_with = "all_as_none")]
        city: Option<String>,
    },
    SetCategoryFilter {
        #[serde(default, deserialize_with = "all_as_none")]
        category: Option<UniversityCategory>,
    },
    SetLanguageFilter {
        #[serde(default, deserialize_with = "all_as_none")]
        language: Option<ProgramLanguage>,
    },
    SetProfessionCategory {
        #[serde(default, deserialize_with = "all_as_none")]
        category: Option<String>,
    },
    ClearFilters,
    SetPage {
        page: usize,
    },
    SetLanguage {
        lang: Language,
    },
    SubmitQuiz {
        quiz: QuizSubmission,
    },
    UpdateProfile {
        patch: ProfilePatch,
    },
    ToggleTargetUniversity {
        id: String,
    },
    AddPortfolioItem {
        item: NewPortfolioItem,
    },
    RemovePortfolioItem {
        id: String,
    },
    AddReview {
        university_id: String,
        review: NewReview,
    },
    /// Manual (re)run of the comparison analysis.
    AnalyzeComparison,
    /// Manual (re)run of the quiz-based guidance.
    AnalyzeGuidance,
    AnalyzePortfolio,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Login { .. } => "login",
            Action::Logout => "logout",
            Action::Navigate { .. } => "navigate",
            Action::ToggleFavorites => "toggleFavorites",
            Action::Back => "back",
            Action::SelectUniversity { .. } => "selectUniversity",
            Action::SelectProfession { .. } => "selectProfession",
            Action::ToggleComparison { .. } => "toggleComparison",
            Action::ToggleSaved { .. } => "toggleSaved",
            Action::SetSearch { .. } => "setSearch",
            Action::ApplySuggestion { .. } => "applySuggestion",
            Action::SetCityFilter { .. } => "setCityFilter",
            Action::SetCategoryFilter { .. } => "setCategoryFilter",
            Action::SetLanguageFilter { .. } => "setLanguageFilter",
            Action::SetProfessionCategory { .. } => "setProfessionCategory",
            Action::ClearFilters => "clearFilters",
            Action::SetPage { .. } => "setPage",
            Action::SetLanguage { .. } => "setLanguage",
            Action::SubmitQuiz { .. } => "submitQuiz",
            Action::UpdateProfile { .. } => "updateProfile",
            Action::ToggleTargetUniversity { .. } => "toggleTargetUniversity",
            Action::AddPortfolioItem { .. } => "addPortfolioItem",
            Action::RemovePortfolioItem { .. } => "removePortfolioItem",
            Action::AddReview { .. } => "addReview",
            Action::AnalyzeComparison => "analyzeComparison",
            Action::AnalyzeGuidance => "analyzeGuidance",
            Action::AnalyzePortfolio => "analyzePortfolio",
        }
    }
}

/// Partial update of the editable student profile fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub gpa: Option<f32>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioItem {
    pub title: String,
    pub category: AchievementCategory,
    /// `YYYY-MM-DD`; today when omitted.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub author: String,
    #[serde(default = "default_review_role")]
    pub role: ReviewRole,
    pub text: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
}

fn default_review_role() -> ReviewRole {
    ReviewRole::Student
}

fn default_rating() -> u8 {
    5
}
