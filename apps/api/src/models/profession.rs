use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Demand {
    High,
    Medium,
    Low,
}

/// Monthly salary in KZT.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Salary {
    pub min: u64,
    pub max: u64,
    pub avg: u64,
}

impl Salary {
    pub fn is_consistent(&self) -> bool {
        self.min <= self.avg && self.avg <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profession {
    pub id: String,
    pub title: String,
    /// Free string, e.g. "IT" or "Engineering".
    pub category: String,
    pub description: String,
    pub salary: Salary,
    pub demand: Demand,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
    /// Substrings matched against university program names.
    #[serde(default)]
    pub program_keywords: Vec<String>,
}

impl Profession {
    /// Case-insensitive title match. `term` must already be lowercased.
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty() || self.title.to_lowercase().contains(term)
    }
}
