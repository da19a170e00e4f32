//! Type-ahead suggestions for the catalog search box.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::i18n::{t, Language, Message};

/// Suggestions start at this many characters.
pub const MIN_TERM_LEN: usize = 2;
pub const MAX_SUGGESTIONS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    University,
    Profession,
    Program,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub text: String,
    pub subtext: String,
}

/// Universities by name/short name, then professions by title, then distinct
/// program names, capped at [`MAX_SUGGESTIONS`].
pub fn suggest(catalog: &Catalog, term: &str, lang: Language) -> Vec<Suggestion> {
    let term = term.trim().to_lowercase();
    if term.chars().count() < MIN_TERM_LEN {
        return Vec::new();
    }

    let universities = catalog
        .universities()
        .iter()
        .filter(|u| {
            u.name.to_lowercase().contains(&term) || u.short_name.to_lowercase().contains(&term)
        })
        .map(|u| Suggestion {
            kind: SuggestionKind::University,
            text: u.name.clone(),
            subtext: u.location.clone(),
        });

    let professions = catalog
        .professions()
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&term))
        .map(|p| Suggestion {
            kind: SuggestionKind::Profession,
            text: p.title.clone(),
            subtext: t(lang, Message::NavProfessions).to_string(),
        });

    // Program names repeat across universities; keep each once.
    let mut seen = BTreeSet::new();
    let programs = catalog
        .universities()
        .iter()
        .flat_map(|u| u.programs.iter())
        .filter(|p| p.name.to_lowercase().contains(&term))
        .filter(|p| seen.insert(p.name.clone()))
        .map(|p| Suggestion {
            kind: SuggestionKind::Program,
            text: p.name.clone(),
            subtext: t(lang, Message::NavPrograms).to_string(),
        })
        .collect::<Vec<_>>();

    universities
        .chain(professions)
        .chain(programs)
        .take(MAX_SUGGESTIONS)
        .collect()
}
