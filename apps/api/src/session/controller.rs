//! View-state controller.
//!
//! [`apply`] is the single entry point for user actions: it takes the current
//! state by reference and returns either a complete replacement state plus
//! the effects the caller has to carry out, or an error leaving the old state
//! untouched. Nothing here performs I/O; AI requests leave as [`Effect`]s
//! carrying a panel [`Ticket`] and come back through the panel's `commit`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::advisor::cache::{fingerprint, id_set_key};
use crate::catalog::pagination::{clamp_page, total_pages};
use crate::catalog::suggestions::SuggestionKind;
use crate::catalog::Catalog;
use crate::config::LogoutPolicy;
use crate::errors::AppError;
use crate::i18n::Language;
use crate::models::{PortfolioItem, Review, StudentProfile, UserProfile};
use crate::session::action::{Action, NewPortfolioItem, NewReview, ProfilePatch};
use crate::session::panel::Ticket;
use crate::session::state::{AuthInfo, LoginMethod, SessionState};
use crate::session::view::{NavTarget, View};

pub const GUEST_NAME: &str = "Гость";
/// Identity recorded by the one-click Google button; there is no real OAuth.
pub const GOOGLE_NAME: &str = "Алихан";
const UNKNOWN_ISSUER: &str = "Unknown";

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("login required")]
    NotAuthenticated,

    #[error("already logged in")]
    AlreadyAuthenticated,

    #[error("unknown university '{0}'")]
    UnknownUniversity(String),

    #[error("unknown profession '{0}'")]
    UnknownProfession(String),

    #[error("unknown portfolio item '{0}'")]
    UnknownPortfolioItem(String),

    #[error("'{action}' is not available on the {view:?} view")]
    NotAllowed { action: &'static str, view: View },

    #[error("the comparison list is empty")]
    EmptyComparison,

    #[error("at least 2 universities are needed for a comparison")]
    InsufficientComparison,

    #[error("complete the quiz first")]
    MissingQuizProfile,

    #[error("an analysis is already running")]
    AnalysisInProgress,

    #[error("waiting for the previous reply")]
    ChatBusy,

    #[error("{0}")]
    Invalid(String),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        let message = err.to_string();
        match err {
            TransitionError::NotAuthenticated => AppError::Unauthorized,
            TransitionError::UnknownUniversity(_)
            | TransitionError::UnknownProfession(_)
            | TransitionError::UnknownPortfolioItem(_) => AppError::NotFound(message),
            TransitionError::Invalid(_) => AppError::Validation(message),
            TransitionError::AlreadyAuthenticated
            | TransitionError::NotAllowed { .. }
            | TransitionError::EmptyComparison
            | TransitionError::InsufficientComparison
            | TransitionError::MissingQuizProfile
            | TransitionError::AnalysisInProgress
            | TransitionError::ChatBusy => AppError::Conflict(message),
        }
    }
}

/// Read-only inputs of a transition besides the state itself.
pub struct Context<'a> {
    pub catalog: &'a Catalog,
    pub logout: LogoutPolicy,
    pub now: DateTime<Utc>,
}

/// Work the caller performs after storing the new state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Effect {
    /// Every view change resets the viewport.
    ScrollToTop,
    AnalyzeComparison {
        ticket: Ticket,
        ids: Vec<String>,
        lang: Language,
    },
    AnalyzeGuidance {
        ticket: Ticket,
        profile: UserProfile,
        lang: Language,
    },
    AnalyzePortfolio {
        ticket: Ticket,
        student: StudentProfile,
        lang: Language,
    },
}

#[derive(Debug)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

pub fn apply(
    state: &SessionState,
    action: Action,
    ctx: &Context<'_>,
) -> Result<Transition, TransitionError> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        Action::Login { method, name, email } => login(&mut next, method, name, email)?,
        _ if !next.is_authenticated() => return Err(TransitionError::NotAuthenticated),
        Action::Logout => logout(&mut next, ctx.logout),
        Action::Navigate { to } => navigate(&mut next, to)?,
        Action::ToggleFavorites => {
            next.saved_only = !next.saved_only;
            next.view = View::Home;
            next.page = 1;
        }
        Action::Back => back(&mut next),
        Action::SelectUniversity { id } => {
            if !matches!(
                next.view,
                View::Home | View::ProfessionDetails | View::Guidance | View::Compare
            ) {
                return Err(not_allowed("selectUniversity", next.view));
            }
            if !ctx.catalog.contains_university(&id) {
                return Err(TransitionError::UnknownUniversity(id));
            }
            next.selected_university = Some(id);
            next.view = View::Details;
        }
        Action::SelectProfession { id } => {
            if next.view != View::Professions {
                return Err(not_allowed("selectProfession", next.view));
            }
            if ctx.catalog.profession(&id).is_none() {
                return Err(TransitionError::UnknownProfession(id));
            }
            next.selected_profession = Some(id);
            next.view = View::ProfessionDetails;
        }
        Action::ToggleComparison { id } => {
            known_university(ctx.catalog, &id)?;
            toggle(&mut next.comparison, id);
        }
        Action::ToggleSaved { id } => {
            known_university(ctx.catalog, &id)?;
            toggle(&mut next.saved, id);
        }
        Action::SetSearch { term } => {
            next.search = term;
            next.page = 1;
        }
        Action::ApplySuggestion { text, kind } => {
            next.search = text;
            next.page = 1;
            next.view = match kind {
                SuggestionKind::Profession => View::Professions,
                SuggestionKind::University | SuggestionKind::Program => View::Home,
            };
        }
        Action::SetCityFilter { city } => {
            if let Some(city) = &city {
                if !ctx.catalog.cities().contains(city) {
                    return Err(TransitionError::Invalid(format!("unknown city '{city}'")));
                }
            }
            next.city = city;
            next.page = 1;
        }
        Action::SetCategoryFilter { category } => {
            next.category = category;
            next.page = 1;
        }
        Action::SetLanguageFilter { language } => {
            next.program_language = language;
            next.page = 1;
        }
        Action::SetProfessionCategory { category } => {
            if let Some(category) = &category {
                if !ctx.catalog.profession_categories().contains(category) {
                    return Err(TransitionError::Invalid(format!(
                        "unknown profession category '{category}'"
                    )));
                }
            }
            next.profession_category = category;
            next.page = 1;
        }
        Action::ClearFilters => {
            next.search.clear();
            next.city = None;
            next.category = None;
            next.program_language = None;
            next.profession_category = None;
            next.saved_only = false;
            next.page = 1;
        }
        Action::SetPage { page } => next.page = page,
        Action::SetLanguage { lang } => next.lang = lang,
        Action::SubmitQuiz { quiz } => {
            let profile = quiz
                .into_profile(ctx.catalog)
                .map_err(TransitionError::Invalid)?;
            student_mut(&mut next).quiz = profile.clone();
            next.quiz_profile = Some(profile);
            next.view = View::Guidance;
        }
        Action::UpdateProfile { patch } => update_profile(&mut next, patch)?,
        Action::ToggleTargetUniversity { id } => {
            known_university(ctx.catalog, &id)?;
            toggle(&mut student_mut(&mut next).target_universities, id);
        }
        Action::AddPortfolioItem { item } => add_portfolio_item(&mut next, item, ctx.now)?,
        Action::RemovePortfolioItem { id } => {
            let portfolio = &mut student_mut(&mut next).portfolio;
            let before = portfolio.len();
            portfolio.retain(|item| item.id != id);
            if portfolio.len() == before {
                return Err(TransitionError::UnknownPortfolioItem(id));
            }
        }
        Action::AddReview {
            university_id,
            review,
        } => add_review(&mut next, ctx, university_id, review)?,
        Action::AnalyzeComparison => {
            if next.view != View::Compare {
                return Err(not_allowed("analyzeComparison", next.view));
            }
            if next.comparison.len() < 2 {
                return Err(TransitionError::InsufficientComparison);
            }
            if next.comparison_panel.is_loading() {
                return Err(TransitionError::AnalysisInProgress);
            }
            effects.push(start_comparison(&mut next));
        }
        Action::AnalyzeGuidance => {
            if next.view != View::Guidance {
                return Err(not_allowed("analyzeGuidance", next.view));
            }
            if next.guidance_panel.is_loading() {
                return Err(TransitionError::AnalysisInProgress);
            }
            let effect = start_guidance(&mut next).ok_or(TransitionError::MissingQuizProfile)?;
            effects.push(effect);
        }
        Action::AnalyzePortfolio => {
            if next.view != View::Profile {
                return Err(not_allowed("analyzePortfolio", next.view));
            }
            if next.profile_panel.is_loading() {
                return Err(TransitionError::AnalysisInProgress);
            }
            let student = student_mut(&mut next).clone();
            let ticket = next.profile_panel.begin(fingerprint(&student));
            effects.push(Effect::AnalyzePortfolio {
                ticket,
                student,
                lang: next.lang,
            });
        }
    }

    settle(state.view, &mut next, ctx, &mut effects);
    Ok(Transition {
        state: next,
        effects,
    })
}

/// Invariants restored after every successful action.
fn settle(previous: View, next: &mut SessionState, ctx: &Context<'_>, effects: &mut Vec<Effect>) {
    if next.view != previous {
        match previous {
            View::Compare => next.comparison_panel.invalidate(),
            View::Guidance => next.guidance_panel.invalidate(),
            View::Profile => next.profile_panel.invalidate(),
            _ => {}
        }
        effects.insert(0, Effect::ScrollToTop);
    }

    if next.view != View::Details {
        next.selected_university = None;
    }
    if next.view != View::ProfessionDetails {
        next.selected_profession = None;
    }

    let view = next.view;
    match view {
        View::Compare if next.comparison.len() >= 2 => {
            if !next.comparison_panel.attempted(&comparison_key(next)) {
                effects.push(start_comparison(next));
            }
        }
        View::Compare => next.comparison_panel.invalidate(),
        View::Guidance => {
            let pending = next
                .quiz_profile
                .as_ref()
                .map(fingerprint)
                .is_some_and(|key| !next.guidance_panel.attempted(&key));
            if pending {
                effects.extend(start_guidance(next));
            }
        }
        _ => {}
    }

    let listed = match next.view {
        View::Professions => next
            .profession_filter()
            .apply(ctx.catalog.professions())
            .len(),
        _ => next
            .university_filter()
            .apply(ctx.catalog.universities(), &next.saved)
            .len(),
    };
    next.page = clamp_page(next.page, total_pages(listed));
    next.updated_at = ctx.now;
}

fn login(
    next: &mut SessionState,
    method: LoginMethod,
    name: Option<String>,
    email: Option<String>,
) -> Result<(), TransitionError> {
    if next.is_authenticated() {
        return Err(TransitionError::AlreadyAuthenticated);
    }
    let typed_name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let (display_name, email) = match method {
        LoginMethod::Guest => (GUEST_NAME.to_string(), None),
        LoginMethod::Google => (GOOGLE_NAME.to_string(), None),
        LoginMethod::Email => (
            typed_name.unwrap_or_else(|| GUEST_NAME.to_string()),
            email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
        ),
    };
    next.student = Some(StudentProfile::with_name(display_name.clone()));
    next.auth = Some(AuthInfo {
        method,
        display_name,
        email,
    });
    next.view = View::Home;
    next.page = 1;
    Ok(())
}

fn logout(next: &mut SessionState, policy: LogoutPolicy) {
    next.auth = None;
    next.view = View::Landing;
    next.selected_university = None;
    next.selected_profession = None;
    next.quiz_profile = None;
    next.student = None;
    next.saved_only = false;
    if policy.clear_comparison {
        next.comparison.clear();
    }
    if policy.clear_saved {
        next.saved.clear();
    }
    next.comparison_panel.reset();
    next.guidance_panel.reset();
    next.profile_panel.reset();
    next.chat.reset(next.lang);
}

fn navigate(next: &mut SessionState, to: NavTarget) -> Result<(), TransitionError> {
    match to {
        NavTarget::Home | NavTarget::Professions => {
            next.saved_only = false;
            next.page = 1;
        }
        NavTarget::Compare if next.comparison.is_empty() => {
            return Err(TransitionError::EmptyComparison)
        }
        NavTarget::Guidance if next.quiz_profile.is_none() => {
            return Err(TransitionError::MissingQuizProfile)
        }
        NavTarget::Compare | NavTarget::Guidance | NavTarget::Profile => {}
    }
    next.view = to.into();
    Ok(())
}

fn back(next: &mut SessionState) {
    match next.view {
        View::Details => {
            next.view = View::Home;
            next.saved_only = false;
        }
        View::ProfessionDetails => next.view = View::Professions,
        View::Compare | View::Guidance | View::Profile => next.view = View::Home,
        View::Home | View::Professions | View::Landing => {}
    }
}

fn update_profile(next: &mut SessionState, patch: ProfilePatch) -> Result<(), TransitionError> {
    let student = student_mut(next);
    let mut updated = student.clone();
    if let Some(name) = patch.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(TransitionError::Invalid("name must not be empty".into()));
        }
        updated.name = name.to_string();
    }
    if let Some(grade) = patch.grade {
        if !(9..=12).contains(&grade) {
            return Err(TransitionError::Invalid("grade must be within 9..=12".into()));
        }
        updated.grade = grade;
    }
    if let Some(gpa) = patch.gpa {
        if !gpa.is_finite() || !(0.0..=5.0).contains(&gpa) {
            return Err(TransitionError::Invalid("gpa must be within 0..=5".into()));
        }
        updated.gpa = gpa;
    }
    if let Some(bio) = patch.bio {
        let bio = bio.trim();
        updated.bio = (!bio.is_empty()).then(|| bio.to_string());
    }
    *student = updated;
    Ok(())
}

fn add_portfolio_item(
    next: &mut SessionState,
    item: NewPortfolioItem,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    let title = item.title.trim();
    if title.is_empty() {
        return Err(TransitionError::Invalid("title must not be empty".into()));
    }
    let date = match item.date.as_deref().map(str::trim) {
        None | Some("") => now.date_naive().to_string(),
        Some(date) => chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| TransitionError::Invalid(format!("invalid date '{date}'")))?
            .to_string(),
    };
    let issuer = item
        .issuer
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| UNKNOWN_ISSUER.to_string());
    let description = item
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let student = student_mut(next);
    let id = timestamp_id(now, |id| student.portfolio.iter().any(|p| p.id == id));
    student.portfolio.push(PortfolioItem {
        id,
        title: title.to_string(),
        category: item.category,
        date,
        issuer,
        description,
    });
    Ok(())
}

fn add_review(
    next: &mut SessionState,
    ctx: &Context<'_>,
    university_id: String,
    review: NewReview,
) -> Result<(), TransitionError> {
    known_university(ctx.catalog, &university_id)?;
    let author = review.author.trim();
    let text = review.text.trim();
    if author.is_empty() || text.is_empty() {
        return Err(TransitionError::Invalid(
            "review needs an author and a text".into(),
        ));
    }
    if !(1..=5).contains(&review.rating) {
        return Err(TransitionError::Invalid("rating must be within 1..=5".into()));
    }

    let date = match next.lang {
        Language::En => ctx.now.format("%-m/%-d/%Y"),
        Language::Ru | Language::Kz => ctx.now.format("%d.%m.%Y"),
    }
    .to_string();
    let reviews = next.reviews.entry(university_id).or_default();
    let id = timestamp_id(ctx.now, |id| reviews.iter().any(|r| r.id == id));
    reviews.insert(
        0,
        Review {
            id,
            author: author.to_string(),
            role: review.role,
            text: text.to_string(),
            rating: review.rating,
            date,
        },
    );
    Ok(())
}

// ── Chat ────────────────────────────────────────────────────────────────────

/// Appends the user's message and marks the chat busy. The returned ticket
/// must be handed back to [`finish_chat`] with the reply.
pub fn begin_chat(state: &mut SessionState, text: &str) -> Result<Ticket, TransitionError> {
    if !state.is_authenticated() {
        return Err(TransitionError::NotAuthenticated);
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(TransitionError::Invalid("message must not be empty".into()));
    }
    if state.chat.busy {
        return Err(TransitionError::ChatBusy);
    }
    Ok(state.chat.begin(text.to_string()))
}

/// Returns false when the transcript was reset while the reply was pending.
pub fn finish_chat(state: &mut SessionState, ticket: Ticket, reply: String) -> bool {
    state.chat.finish(ticket, reply)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn start_comparison(next: &mut SessionState) -> Effect {
    let ticket = next.comparison_panel.begin(comparison_key(next));
    Effect::AnalyzeComparison {
        ticket,
        ids: next.comparison.clone(),
        lang: next.lang,
    }
}

fn start_guidance(next: &mut SessionState) -> Option<Effect> {
    let profile = next.quiz_profile.clone()?;
    let ticket = next.guidance_panel.begin(fingerprint(&profile));
    Some(Effect::AnalyzeGuidance {
        ticket,
        profile,
        lang: next.lang,
    })
}

/// Panel keys cover the request input only. A language switch keeps the
/// loaded report; re-running it in the new language is a manual analyze.
fn comparison_key(state: &SessionState) -> String {
    id_set_key(&state.comparison)
}

fn toggle(list: &mut Vec<String>, id: String) {
    match list.iter().position(|existing| *existing == id) {
        Some(index) => {
            list.remove(index);
        }
        None => list.push(id),
    }
}

fn known_university(catalog: &Catalog, id: &str) -> Result<(), TransitionError> {
    if catalog.contains_university(id) {
        Ok(())
    } else {
        Err(TransitionError::UnknownUniversity(id.to_string()))
    }
}

fn not_allowed(action: &'static str, view: View) -> TransitionError {
    TransitionError::NotAllowed { action, view }
}

fn student_mut(next: &mut SessionState) -> &mut StudentProfile {
    let name = next
        .auth
        .as_ref()
        .map(|a| a.display_name.clone())
        .unwrap_or_else(|| GUEST_NAME.to_string());
    next.student
        .get_or_insert_with(|| StudentProfile::with_name(name))
}

/// Millisecond timestamp, bumped past any id already taken.
fn timestamp_id(now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = now.timestamp_millis();
    while taken(&candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::advisor::schema::{ComparisonReport, ComparisonRow};
    use crate::models::{AchievementCategory, ReviewRole};
    use crate::session::panel::{CommitOutcome, PanelStatus};
    use crate::session::quiz::QuizSubmission;

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    fn ctx(catalog: &Catalog) -> Context<'_> {
        Context {
            catalog,
            logout: LogoutPolicy::default(),
            now: Utc.with_ymd_and_hms(2025, 3, 7, 10, 0, 0).unwrap(),
        }
    }

    fn run(state: &SessionState, action: Action, ctx: &Context<'_>) -> Transition {
        apply(state, action, ctx).unwrap()
    }

    fn logged_in(ctx: &Context<'_>) -> SessionState {
        let state = SessionState::new(Uuid::new_v4(), ctx.now);
        run(
            &state,
            Action::Login {
                method: LoginMethod::Guest,
                name: None,
                email: None,
            },
            ctx,
        )
        .state
    }

    fn quiz() -> QuizSubmission {
        QuizSubmission {
            score: 95,
            subject_pair: "Мат-Физ".to_string(),
            interests: vec!["IT & Technologies".to_string()],
            city: Some("Алматы".to_string()),
        }
    }

    fn comparison_report(ids: &[&str]) -> ComparisonReport {
        ComparisonReport {
            summary: "s".into(),
            verdict: "v".into(),
            table: vec![ComparisonRow {
                criteria: "Репутация".into(),
                values: ids.iter().map(|id| (id.to_string(), "ok".to_string())).collect(),
            }],
        }
    }

    #[test]
    fn test_actions_before_login_are_rejected() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = SessionState::new(Uuid::new_v4(), ctx.now);
        let err = apply(
            &state,
            Action::Navigate {
                to: NavTarget::Home,
            },
            &ctx,
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::NotAuthenticated);
    }

    #[test]
    fn test_every_login_method_lands_on_home() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let cases = [
            (LoginMethod::Guest, None, GUEST_NAME),
            (LoginMethod::Google, None, GOOGLE_NAME),
            (LoginMethod::Email, Some("Дана"), "Дана"),
            (LoginMethod::Email, Some("   "), GUEST_NAME),
        ];
        for (method, name, expected) in cases {
            let state = SessionState::new(Uuid::new_v4(), ctx.now);
            let next = run(
                &state,
                Action::Login {
                    method,
                    name: name.map(str::to_string),
                    email: Some("dana@example.kz".into()),
                },
                &ctx,
            );
            assert_eq!(next.state.view, View::Home);
            assert_eq!(next.state.auth.as_ref().unwrap().display_name, expected);
            assert_eq!(next.state.student.as_ref().unwrap().name, expected);
            assert_eq!(next.effects, vec![Effect::ScrollToTop]);
        }
    }

    #[test]
    fn test_second_login_conflicts() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let err = apply(
            &state,
            Action::Login {
                method: LoginMethod::Google,
                name: None,
                email: None,
            },
            &ctx,
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::AlreadyAuthenticated);
    }

    #[test]
    fn test_logout_keeps_comparison_and_saved_by_default() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        for action in [
            Action::ToggleComparison { id: "nu".into() },
            Action::ToggleSaved { id: "kbtu".into() },
            Action::SubmitQuiz { quiz: quiz() },
        ] {
            state = run(&state, action, &ctx).state;
        }
        let out = run(&state, Action::Logout, &ctx).state;
        assert!(!out.is_authenticated());
        assert_eq!(out.view, View::Landing);
        assert!(out.quiz_profile.is_none());
        assert!(out.student.is_none());
        assert!(out.selected_university.is_none());
        assert_eq!(out.comparison, vec!["nu".to_string()]);
        assert_eq!(out.saved, vec!["kbtu".to_string()]);
        assert_eq!(out.guidance_panel.status(), PanelStatus::Idle);
        assert_eq!(out.chat.messages.len(), 1);
    }

    #[test]
    fn test_logout_policy_can_clear_lists() {
        let catalog = catalog();
        let mut ctx = ctx(&catalog);
        ctx.logout = LogoutPolicy {
            clear_comparison: true,
            clear_saved: true,
        };
        let mut state = logged_in(&ctx);
        state = run(&state, Action::ToggleComparison { id: "nu".into() }, &ctx).state;
        state = run(&state, Action::ToggleSaved { id: "nu".into() }, &ctx).state;
        let out = run(&state, Action::Logout, &ctx).state;
        assert!(out.comparison.is_empty());
        assert!(out.saved.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_list() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let once = run(&state, Action::ToggleSaved { id: "sdu".into() }, &ctx).state;
        assert_eq!(once.saved, vec!["sdu".to_string()]);
        let twice = run(&once, Action::ToggleSaved { id: "sdu".into() }, &ctx).state;
        assert_eq!(twice.saved, state.saved);
    }

    #[test]
    fn test_toggle_unknown_university_fails() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let err = apply(&state, Action::ToggleComparison { id: "mit".into() }, &ctx).unwrap_err();
        assert_eq!(err, TransitionError::UnknownUniversity("mit".into()));
    }

    #[test]
    fn test_filter_change_resets_page() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        state = run(&state, Action::SetPage { page: 3 }, &ctx).state;
        assert_eq!(state.page, 3);
        state = run(
            &state,
            Action::SetCityFilter {
                city: Some("Астана".into()),
            },
            &ctx,
        )
        .state;
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_set_page_is_clamped() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let high = run(&state, Action::SetPage { page: 99 }, &ctx).state;
        assert_eq!(high.page, 4);
        let low = run(&state, Action::SetPage { page: 0 }, &ctx).state;
        assert_eq!(low.page, 1);
    }

    #[test]
    fn test_unknown_city_is_invalid() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let err = apply(
            &state,
            Action::SetCityFilter {
                city: Some("Париж".into()),
            },
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(_)));
    }

    #[test]
    fn test_nav_clears_saved_only_but_favorites_sets_it() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        state = run(&state, Action::ToggleFavorites, &ctx).state;
        assert!(state.saved_only);
        assert_eq!(state.view, View::Home);

        let prof = run(
            &state,
            Action::Navigate {
                to: NavTarget::Professions,
            },
            &ctx,
        );
        assert!(!prof.state.saved_only);
        assert_eq!(prof.state.page, 1);
        assert_eq!(prof.effects, vec![Effect::ScrollToTop]);
    }

    #[test]
    fn test_select_and_back_clear_selection() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        state = run(&state, Action::SelectUniversity { id: "kbtu".into() }, &ctx).state;
        assert_eq!(state.view, View::Details);
        assert_eq!(state.selected_university.as_deref(), Some("kbtu"));
        state = run(&state, Action::Back, &ctx).state;
        assert_eq!(state.view, View::Home);
        assert!(state.selected_university.is_none());

        state = run(
            &state,
            Action::Navigate {
                to: NavTarget::Professions,
            },
            &ctx,
        )
        .state;
        state = run(
            &state,
            Action::SelectProfession {
                id: "backend-dev".into(),
            },
            &ctx,
        )
        .state;
        assert_eq!(state.view, View::ProfessionDetails);
        state = run(&state, Action::Back, &ctx).state;
        assert_eq!(state.view, View::Professions);
        assert!(state.selected_profession.is_none());
    }

    #[test]
    fn test_select_profession_outside_professions_view() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let err = apply(
            &state,
            Action::SelectProfession {
                id: "backend-dev".into(),
            },
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::NotAllowed { .. }));
    }

    #[test]
    fn test_back_on_home_is_noop() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let out = run(&state, Action::Back, &ctx);
        assert_eq!(out.state.view, View::Home);
        assert!(out.effects.is_empty());
    }

    #[test]
    fn test_compare_requires_selection() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let err = apply(
            &state,
            Action::Navigate {
                to: NavTarget::Compare,
            },
            &ctx,
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::EmptyComparison);
    }

    #[test]
    fn test_compare_with_one_id_does_not_request() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        state = run(&state, Action::ToggleComparison { id: "nu".into() }, &ctx).state;
        let out = run(
            &state,
            Action::Navigate {
                to: NavTarget::Compare,
            },
            &ctx,
        );
        assert_eq!(out.state.view, View::Compare);
        assert_eq!(out.effects, vec![Effect::ScrollToTop]);
    }

    #[test]
    fn test_compare_requests_once_per_distinct_set() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        for id in ["nu", "kbtu"] {
            state = run(&state, Action::ToggleComparison { id: id.into() }, &ctx).state;
        }
        let entered = run(
            &state,
            Action::Navigate {
                to: NavTarget::Compare,
            },
            &ctx,
        );
        assert_eq!(entered.effects.len(), 2);
        let ticket = match &entered.effects[1] {
            Effect::AnalyzeComparison { ids, ticket, .. } => {
                assert_eq!(ids, &vec!["nu".to_string(), "kbtu".to_string()]);
                *ticket
            }
            other => panic!("unexpected effect {other:?}"),
        };

        let mut state = entered.state;
        assert_eq!(
            state
                .comparison_panel
                .commit::<()>(ticket, Ok(comparison_report(&["nu", "kbtu"]))),
            CommitOutcome::Applied
        );

        let again = run(&state, Action::SetLanguage { lang: Language::En }, &ctx);
        assert!(again.effects.is_empty());
        assert!(again.state.comparison_panel.data().is_some());

        let grown = run(&again.state, Action::ToggleComparison { id: "sdu".into() }, &ctx);
        assert!(matches!(
            grown.effects.as_slice(),
            [Effect::AnalyzeComparison { .. }]
        ));
        assert_eq!(grown.state.comparison.len(), 3);
    }

    #[test]
    fn test_language_switch_keeps_report_until_manual_rerun() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        for id in ["nu", "kbtu"] {
            state = run(&state, Action::ToggleComparison { id: id.into() }, &ctx).state;
        }
        let entered = run(
            &state,
            Action::Navigate {
                to: NavTarget::Compare,
            },
            &ctx,
        );
        let ticket = match &entered.effects[1] {
            Effect::AnalyzeComparison { ticket, .. } => *ticket,
            other => panic!("unexpected effect {other:?}"),
        };
        let mut state = entered.state;
        state
            .comparison_panel
            .commit::<()>(ticket, Ok(comparison_report(&["nu", "kbtu"])));

        let switched = run(&state, Action::SetLanguage { lang: Language::Kz }, &ctx);
        assert!(switched.effects.is_empty());
        assert!(!switched.state.comparison_panel.is_loading());
        assert!(switched.state.comparison_panel.data().is_some());

        let rerun = run(&switched.state, Action::AnalyzeComparison, &ctx);
        assert!(matches!(
            rerun.effects.as_slice(),
            [Effect::AnalyzeComparison {
                lang: Language::Kz,
                ..
            }]
        ));
        assert!(rerun.state.comparison_panel.data().is_some());
    }

    #[test]
    fn test_failed_comparison_leaves_retry_and_waits() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        for id in ["nu", "kbtu"] {
            state = run(&state, Action::ToggleComparison { id: id.into() }, &ctx).state;
        }
        let entered = run(
            &state,
            Action::Navigate {
                to: NavTarget::Compare,
            },
            &ctx,
        );
        let ticket = match &entered.effects[1] {
            Effect::AnalyzeComparison { ticket, .. } => *ticket,
            other => panic!("unexpected effect {other:?}"),
        };
        let mut state = entered.state;
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        state.comparison_panel.commit(ticket, Err(parse_error));

        assert!(state.comparison_panel.data().is_none());
        assert!(!state.comparison_panel.is_loading());
        assert!(state.comparison_panel.retry_available());

        let idle = run(&state, Action::SetLanguage { lang: Language::Ru }, &ctx);
        assert!(idle.effects.is_empty());

        let retried = run(&idle.state, Action::AnalyzeComparison, &ctx);
        assert!(matches!(
            retried.effects.as_slice(),
            [Effect::AnalyzeComparison { .. }]
        ));
        assert!(retried.state.comparison_panel.is_loading());
    }

    #[test]
    fn test_response_after_leaving_compare_is_stale() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        for id in ["nu", "kbtu"] {
            state = run(&state, Action::ToggleComparison { id: id.into() }, &ctx).state;
        }
        let entered = run(
            &state,
            Action::Navigate {
                to: NavTarget::Compare,
            },
            &ctx,
        );
        let ticket = match &entered.effects[1] {
            Effect::AnalyzeComparison { ticket, .. } => *ticket,
            other => panic!("unexpected effect {other:?}"),
        };
        let mut state = run(&entered.state, Action::Back, &ctx).state;
        assert_eq!(state.view, View::Home);
        let outcome = state
            .comparison_panel
            .commit::<()>(ticket, Ok(comparison_report(&["nu", "kbtu"])));
        assert_eq!(outcome, CommitOutcome::Stale);
        assert!(state.comparison_panel.data().is_none());
    }

    #[test]
    fn test_quiz_submission_goes_to_guidance() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let out = run(&state, Action::SubmitQuiz { quiz: quiz() }, &ctx);
        let profile = out.state.quiz_profile.clone().unwrap();
        assert_eq!(profile.score, 95);
        assert_eq!(profile.subject_pair, "Мат-Физ");
        assert_eq!(profile.interests, vec!["IT & Technologies".to_string()]);
        assert_eq!(profile.city, "Алматы");
        assert_eq!(out.state.view, View::Guidance);
        assert_eq!(out.state.student.as_ref().unwrap().quiz, profile);
        assert!(matches!(
            out.effects.as_slice(),
            [Effect::ScrollToTop, Effect::AnalyzeGuidance { .. }]
        ));
    }

    #[test]
    fn test_language_switch_does_not_repeat_guidance() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let submitted = run(&state, Action::SubmitQuiz { quiz: quiz() }, &ctx).state;
        let switched = run(&submitted, Action::SetLanguage { lang: Language::En }, &ctx);
        assert!(switched.effects.is_empty());
        assert!(switched.state.guidance_panel.is_loading());
    }

    #[test]
    fn test_guidance_requires_quiz() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let err = apply(
            &state,
            Action::Navigate {
                to: NavTarget::Guidance,
            },
            &ctx,
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::MissingQuizProfile);
    }

    #[test]
    fn test_invalid_quiz_keeps_state() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let mut bad = quiz();
        bad.score = 141;
        let err = apply(&state, Action::SubmitQuiz { quiz: bad }, &ctx).unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(_)));
        assert!(state.quiz_profile.is_none());
    }

    #[test]
    fn test_profile_patch_validation() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let ok = run(
            &state,
            Action::UpdateProfile {
                patch: ProfilePatch {
                    name: Some("Айгерим".into()),
                    grade: Some(10),
                    gpa: Some(4.5),
                    bio: Some(String::new()),
                },
            },
            &ctx,
        )
        .state;
        let student = ok.student.unwrap();
        assert_eq!(student.name, "Айгерим");
        assert_eq!(student.grade, 10);
        assert!(student.bio.is_none());

        let err = apply(
            &state,
            Action::UpdateProfile {
                patch: ProfilePatch {
                    grade: Some(13),
                    ..ProfilePatch::default()
                },
            },
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(_)));
    }

    #[test]
    fn test_portfolio_add_and_remove() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let item = NewPortfolioItem {
            title: "Хакатон".into(),
            category: AchievementCategory::Project,
            date: None,
            issuer: None,
            description: None,
        };
        let mut next = run(&state, Action::AddPortfolioItem { item: item.clone() }, &ctx).state;
        next = run(&next, Action::AddPortfolioItem { item }, &ctx).state;
        let portfolio = &next.student.as_ref().unwrap().portfolio;
        assert_eq!(portfolio.len(), 4);
        let millis = ctx.now.timestamp_millis();
        assert_eq!(portfolio[2].id, millis.to_string());
        assert_eq!(portfolio[3].id, (millis + 1).to_string());
        assert_eq!(portfolio[2].date, "2025-03-07");
        assert_eq!(portfolio[2].issuer, UNKNOWN_ISSUER);

        let removed = run(
            &next,
            Action::RemovePortfolioItem {
                id: millis.to_string(),
            },
            &ctx,
        )
        .state;
        assert_eq!(removed.student.unwrap().portfolio.len(), 3);

        let err = apply(&next, Action::RemovePortfolioItem { id: "nope".into() }, &ctx).unwrap_err();
        assert_eq!(err, TransitionError::UnknownPortfolioItem("nope".into()));
    }

    #[test]
    fn test_review_is_prepended_with_localized_date() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        let review = |text: &str| Action::AddReview {
            university_id: "sdu".into(),
            review: NewReview {
                author: "Ерлан".into(),
                role: ReviewRole::Alumni,
                text: text.into(),
                rating: 4,
            },
        };
        state = run(&state, review("первый"), &ctx).state;
        state = run(&state, Action::SetLanguage { lang: Language::En }, &ctx).state;
        state = run(&state, review("second"), &ctx).state;
        let reviews = &state.reviews["sdu"];
        assert_eq!(reviews[0].text, "second");
        assert_eq!(reviews[0].date, "3/7/2025");
        assert_eq!(reviews[1].date, "07.03.2025");
    }

    #[test]
    fn test_portfolio_analysis_only_on_profile_view() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let err = apply(&state, Action::AnalyzePortfolio, &ctx).unwrap_err();
        assert!(matches!(err, TransitionError::NotAllowed { .. }));

        let profile = run(
            &state,
            Action::Navigate {
                to: NavTarget::Profile,
            },
            &ctx,
        )
        .state;
        let out = run(&profile, Action::AnalyzePortfolio, &ctx);
        assert!(matches!(
            out.effects.as_slice(),
            [Effect::AnalyzePortfolio { .. }]
        ));
        let err = apply(&out.state, Action::AnalyzePortfolio, &ctx).unwrap_err();
        assert_eq!(err, TransitionError::AnalysisInProgress);
    }

    #[test]
    fn test_chat_busy_flag() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let mut state = logged_in(&ctx);
        let ticket = begin_chat(&mut state, "Какие шансы на грант?").unwrap();
        assert_eq!(begin_chat(&mut state, "ещё"), Err(TransitionError::ChatBusy));
        assert!(finish_chat(&mut state, ticket, "Хорошие".into()));
        assert_eq!(state.chat.messages.len(), 3);
        assert_eq!(
            begin_chat(&mut state, "  "),
            Err(TransitionError::Invalid("message must not be empty".into()))
        );
    }

    #[test]
    fn test_apply_suggestion_switches_list() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        let state = logged_in(&ctx);
        let out = run(
            &state,
            Action::ApplySuggestion {
                text: "Data Analyst".into(),
                kind: SuggestionKind::Profession,
            },
            &ctx,
        )
        .state;
        assert_eq!(out.view, View::Professions);
        assert_eq!(out.search, "Data Analyst");
    }
}
