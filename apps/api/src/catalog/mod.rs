//! Catalog — the immutable university and profession dataset plus the pure
//! functions that derive filtered, searched and paginated views of it.
//!
//! Loaded once at startup and shared read-only behind an `Arc`. Everything
//! user-specific (saved, comparison, reviews) lives in session overlays keyed
//! by id; the dataset itself is never mutated.

pub mod filter;
pub mod handlers;
pub mod matching;
pub mod pagination;
pub mod suggestions;

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::models::{Profession, University};

const UNIVERSITIES_JSON: &str = include_str!("../../data/universities.json");
const PROFESSIONS_JSON: &str = include_str!("../../data/professions.json");

#[derive(Debug, Clone)]
pub struct Catalog {
    universities: Vec<University>,
    professions: Vec<Profession>,
}

impl Catalog {
    /// Builds a catalog and checks dataset invariants.
    pub fn new(universities: Vec<University>, professions: Vec<Profession>) -> Result<Self> {
        let mut seen = HashSet::new();
        for uni in &universities {
            if !seen.insert(uni.id.as_str()) {
                bail!("duplicate university id '{}'", uni.id);
            }
            if uni.ranking == 0 {
                bail!("university '{}' has a non-positive ranking", uni.id);
            }
        }

        let mut seen = HashSet::new();
        for prof in &professions {
            if !seen.insert(prof.id.as_str()) {
                bail!("duplicate profession id '{}'", prof.id);
            }
            if !prof.salary.is_consistent() {
                bail!("profession '{}' has salary outside min..=max", prof.id);
            }
        }

        Ok(Self {
            universities,
            professions,
        })
    }

    /// Loads the dataset compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(UNIVERSITIES_JSON, PROFESSIONS_JSON)
    }

    /// Loads `universities.json` and `professions.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let unis = std::fs::read_to_string(dir.join("universities.json"))
            .with_context(|| format!("reading universities.json from {}", dir.display()))?;
        let profs = std::fs::read_to_string(dir.join("professions.json"))
            .with_context(|| format!("reading professions.json from {}", dir.display()))?;
        Self::from_json(&unis, &profs)
    }

    pub fn from_json(universities: &str, professions: &str) -> Result<Self> {
        let universities: Vec<University> =
            serde_json::from_str(universities).context("parsing universities dataset")?;
        let professions: Vec<Profession> =
            serde_json::from_str(professions).context("parsing professions dataset")?;
        let catalog = Self::new(universities, professions)?;
        info!(
            "Catalog loaded: {} universities, {} professions",
            catalog.universities.len(),
            catalog.professions.len()
        );
        Ok(catalog)
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn professions(&self) -> &[Profession] {
        &self.professions
    }

    pub fn university(&self, id: &str) -> Option<&University> {
        self.universities.iter().find(|u| u.id == id)
    }

    pub fn profession(&self, id: &str) -> Option<&Profession> {
        self.professions.iter().find(|p| p.id == id)
    }

    pub fn contains_university(&self, id: &str) -> bool {
        self.university(id).is_some()
    }

    /// Resolves ids in the given order, skipping unknown ones.
    pub fn universities_by_ids<'a>(&'a self, ids: &[String]) -> Vec<&'a University> {
        ids.iter().filter_map(|id| self.university(id)).collect()
    }

    /// Sorted distinct city names.
    pub fn cities(&self) -> Vec<String> {
        self.universities
            .iter()
            .map(|u| u.location.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct profession categories.
    pub fn profession_categories(&self) -> Vec<String> {
        self.professions
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
