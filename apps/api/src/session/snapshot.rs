//! Read model of a session: everything the client needs to render the current
//! screen, resolved against the catalog.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::advisor::schema::{ComparisonReport, ProfileReport, TwinReport};
use crate::catalog::matching::universities_for_profession;
use crate::catalog::pagination::{paginate, Page};
use crate::catalog::Catalog;
use crate::i18n::{t, Language, Message};
use crate::models::{
    Profession, ProgramLanguage, Review, StudentProfile, University, UniversityCategory,
    UserProfile,
};
use crate::session::panel::PanelView;
use crate::session::state::{AuthInfo, ChatMessage, SessionState};
use crate::session::view::View;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub view: View,
    pub lang: Language,
    pub user: Option<AuthInfo>,
    pub comparison: Vec<String>,
    pub saved: Vec<String>,
    pub filters: FiltersView,
    pub screen: Screen,
    pub chat: ChatView,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersView {
    pub search: String,
    pub city: Option<String>,
    pub category: Option<UniversityCategory>,
    pub language: Option<ProgramLanguage>,
    pub saved_only: bool,
    pub profession_category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
    pub busy: bool,
}

/// Content of the active view. `Missing` replaces a view whose record is
/// gone and carries the message shown next to the back button.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Screen {
    Landing,
    Home {
        list: Page<University>,
        empty_message: Option<&'static str>,
    },
    Professions {
        list: Page<Profession>,
        empty_message: Option<&'static str>,
    },
    Details {
        university: University,
        reviews: Vec<Review>,
        review_count: usize,
        /// Mean star rating; absent without reviews.
        average_rating: Option<f64>,
        in_comparison: bool,
        saved: bool,
    },
    ProfessionDetails {
        profession: Profession,
        universities: Vec<University>,
    },
    Compare {
        universities: Vec<University>,
        notice: Option<&'static str>,
        analysis: PanelView<ComparisonReport>,
    },
    Guidance {
        profile: UserProfile,
        analysis: PanelView<TwinReport>,
    },
    Profile {
        student: StudentProfile,
        targets: Vec<University>,
        analysis: PanelView<ProfileReport>,
    },
    Missing {
        message: &'static str,
    },
}

impl SessionSnapshot {
    pub fn build(state: &SessionState, catalog: &Catalog) -> Self {
        Self {
            id: state.id,
            view: state.view,
            lang: state.lang,
            user: state.auth.clone(),
            comparison: state.comparison.clone(),
            saved: state.saved.clone(),
            filters: FiltersView {
                search: state.search.clone(),
                city: state.city.clone(),
                category: state.category,
                language: state.program_language,
                saved_only: state.saved_only,
                profession_category: state.profession_category.clone(),
            },
            screen: screen(state, catalog),
            chat: ChatView {
                messages: state.chat.messages.clone(),
                busy: state.chat.busy,
            },
            updated_at: state.updated_at,
        }
    }
}

fn screen(state: &SessionState, catalog: &Catalog) -> Screen {
    let missing = |msg| Screen::Missing {
        message: t(state.lang, msg),
    };

    match state.view {
        View::Landing => Screen::Landing,
        View::Home => {
            let matches: Vec<University> = state
                .university_filter()
                .apply(catalog.universities(), &state.saved)
                .into_iter()
                .cloned()
                .collect();
            let empty_message = matches.is_empty().then(|| {
                let msg = if state.saved_only {
                    Message::FavoritesEmpty
                } else {
                    Message::NotFound
                };
                t(state.lang, msg)
            });
            Screen::Home {
                list: paginate(&matches, state.page),
                empty_message,
            }
        }
        View::Professions => {
            let matches: Vec<Profession> = state
                .profession_filter()
                .apply(catalog.professions())
                .into_iter()
                .cloned()
                .collect();
            Screen::Professions {
                empty_message: matches
                    .is_empty()
                    .then(|| t(state.lang, Message::NotFound)),
                list: paginate(&matches, state.page),
            }
        }
        View::Details => {
            let Some(university) = state
                .selected_university
                .as_deref()
                .and_then(|id| catalog.university(id))
            else {
                return missing(Message::MissingSelection);
            };
            let reviews = state
                .reviews
                .get(&university.id)
                .cloned()
                .unwrap_or_default();
            let average_rating = (!reviews.is_empty()).then(|| {
                reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / reviews.len() as f64
            });
            Screen::Details {
                review_count: reviews.len(),
                average_rating,
                reviews,
                in_comparison: state.comparison.contains(&university.id),
                saved: state.saved.contains(&university.id),
                university: university.clone(),
            }
        }
        View::ProfessionDetails => {
            let Some(profession) = state
                .selected_profession
                .as_deref()
                .and_then(|id| catalog.profession(id))
            else {
                return missing(Message::MissingSelection);
            };
            Screen::ProfessionDetails {
                universities: universities_for_profession(catalog, profession)
                    .into_iter()
                    .cloned()
                    .collect(),
                profession: profession.clone(),
            }
        }
        View::Compare => Screen::Compare {
            universities: catalog
                .universities_by_ids(&state.comparison)
                .into_iter()
                .cloned()
                .collect(),
            notice: (state.comparison.len() < 2).then(|| t(state.lang, Message::CompareMin)),
            analysis: PanelView::new(&state.comparison_panel, state.lang),
        },
        View::Guidance => match &state.quiz_profile {
            Some(profile) => Screen::Guidance {
                profile: profile.clone(),
                analysis: PanelView::new(&state.guidance_panel, state.lang),
            },
            None => missing(Message::MissingQuizProfile),
        },
        View::Profile => match &state.student {
            Some(student) => Screen::Profile {
                targets: catalog
                    .universities_by_ids(&student.target_universities)
                    .into_iter()
                    .cloned()
                    .collect(),
                student: student.clone(),
                analysis: PanelView::new(&state.profile_panel, state.lang),
            },
            None => missing(Message::MissingSelection),
        },
    }
}
