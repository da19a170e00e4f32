use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::filter::{all_as_none, ProfessionFilter, UniversityFilter};
use crate::catalog::matching::universities_for_profession;
use crate::catalog::pagination::{paginate, Page};
use crate::catalog::suggestions::{suggest, Suggestion};
use crate::errors::AppError;
use crate::i18n::Language;
use crate::models::{Profession, ProgramLanguage, University, UniversityCategory};
use crate::session::quiz::{ANY_CITY, INTERESTS, SUBJECT_PAIRS};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptions {
    pub cities: Vec<String>,
    pub categories: Vec<UniversityCategory>,
    pub languages: Vec<ProgramLanguage>,
    pub profession_categories: Vec<String>,
    pub subject_pairs: Vec<&'static str>,
    pub interests: Vec<&'static str>,
    pub any_city: &'static str,
}

/// GET /api/v1/catalog/options
pub async fn handle_options(State(state): State<AppState>) -> Json<CatalogOptions> {
    Json(CatalogOptions {
        cities: state.catalog.cities(),
        categories: UniversityCategory::ALL.to_vec(),
        languages: ProgramLanguage::ALL.to_vec(),
        profession_categories: state.catalog.profession_categories(),
        subject_pairs: SUBJECT_PAIRS.to_vec(),
        interests: INTERESTS.to_vec(),
        any_city: ANY_CITY,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct UniversityQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, deserialize_with = "all_as_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "all_as_none")]
    pub category: Option<UniversityCategory>,
    #[serde(default, deserialize_with = "all_as_none")]
    pub language: Option<ProgramLanguage>,
    #[serde(default)]
    pub page: Option<usize>,
}

/// GET /api/v1/universities
pub async fn handle_list_universities(
    State(state): State<AppState>,
    Query(query): Query<UniversityQuery>,
) -> Json<Page<University>> {
    let filter = UniversityFilter {
        search: query.search,
        city: query.city,
        category: query.category,
        language: query.language,
        saved_only: false,
    };
    let matches: Vec<University> = filter
        .apply(state.catalog.universities(), &[])
        .into_iter()
        .cloned()
        .collect();
    Json(paginate(&matches, query.page.unwrap_or(1)))
}

/// GET /api/v1/universities/:id
pub async fn handle_get_university(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<University>, AppError> {
    state
        .catalog
        .university(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("University {id} not found")))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfessionQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, deserialize_with = "all_as_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}

/// GET /api/v1/professions
pub async fn handle_list_professions(
    State(state): State<AppState>,
    Query(query): Query<ProfessionQuery>,
) -> Json<Page<Profession>> {
    let filter = ProfessionFilter {
        search: query.search,
        category: query.category,
    };
    let matches: Vec<Profession> = filter
        .apply(state.catalog.professions())
        .into_iter()
        .cloned()
        .collect();
    Json(paginate(&matches, query.page.unwrap_or(1)))
}

#[derive(Serialize)]
pub struct ProfessionDetails {
    pub profession: Profession,
    pub universities: Vec<University>,
}

/// GET /api/v1/professions/:id
pub async fn handle_get_profession(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfessionDetails>, AppError> {
    let profession = state
        .catalog
        .profession(&id)
        .ok_or_else(|| AppError::NotFound(format!("Profession {id} not found")))?;
    let universities = universities_for_profession(&state.catalog, profession)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(ProfessionDetails {
        profession: profession.clone(),
        universities,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub lang: Language,
}

/// GET /api/v1/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<Vec<Suggestion>> {
    Json(suggest(&state.catalog, &query.q, query.lang))
}
