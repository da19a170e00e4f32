//! Catalog predicates. All active filters combine with logical AND; an empty
//! result is a valid outcome.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use crate::models::{ProgramLanguage, Profession, University, UniversityCategory};

/// Sentinel option value that disables a filter.
pub const ALL: &str = "All";

/// Deserializes a filter choice, mapping the `All` sentinel (or an empty
/// value) to `None`.
pub fn all_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") | Some(ALL) => Ok(None),
        Some(value) => serde_json::from_value(serde_json::Value::String(value.to_string()))
            .map(Some)
            .map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default, deserialize_with = "all_as_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "all_as_none")]
    pub category: Option<UniversityCategory>,
    #[serde(default, deserialize_with = "all_as_none")]
    pub language: Option<ProgramLanguage>,
    /// Restricts results to the saved set. City, category and language are
    /// ignored while this is on; only the search term still applies.
    #[serde(default)]
    pub saved_only: bool,
}

impl UniversityFilter {
    pub fn matches(&self, uni: &University, saved: &[String]) -> bool {
        let term = self.search.to_lowercase();
        if self.saved_only {
            return saved.contains(&uni.id) && uni.matches_search(&term);
        }

        uni.matches_search(&term)
            && self.city.as_ref().map_or(true, |c| &uni.location == c)
            && self.category.map_or(true, |c| uni.category == Some(c))
            && self.language.map_or(true, |l| uni.offers_language(l))
    }

    /// Dataset order is preserved.
    pub fn apply<'a>(&self, universities: &'a [University], saved: &[String]) -> Vec<&'a University> {
        universities
            .iter()
            .filter(|u| self.matches(u, saved))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default, deserialize_with = "all_as_none")]
    pub category: Option<String>,
}

impl ProfessionFilter {
    pub fn matches(&self, prof: &Profession) -> bool {
        let term = self.search.to_lowercase();
        prof.matches_search(&term) && self.category.as_ref().map_or(true, |c| &prof.category == c)
    }

    pub fn apply<'a>(&self, professions: &'a [Profession]) -> Vec<&'a Profession> {
        professions.iter().filter(|p| self.matches(p)).collect()
    }
}
