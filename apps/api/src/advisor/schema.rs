//! Strict schemas for the three structured AI responses.
//!
//! Parsing is two-step: serde rejects anything that is not the expected
//! shape, then `validate` checks the constraints serde cannot express
//! (ranges, id coverage, catalog membership). Either failure sends the user
//! to the retry path.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

// ────────────────────────────────────────────────────────────────────────────
// Comparison
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub criteria: String,
    /// University id → short assessment.
    pub values: BTreeMap<String, String>,
}

/// Qualitative side-by-side table for the comparison view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub summary: String,
    pub verdict: String,
    pub table: Vec<ComparisonRow>,
}

impl ComparisonReport {
    /// Every row must be keyed by exactly the requested ids.
    pub fn validate(&self, ids: &[String]) -> Result<(), String> {
        if self.table.is_empty() {
            return Err("comparison table is empty".to_string());
        }
        let expected: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        for row in &self.table {
            let actual: BTreeSet<&str> = row.values.keys().map(String::as_str).collect();
            if actual != expected {
                return Err(format!(
                    "row '{}' covers {:?}, expected {:?}",
                    row.criteria, actual, expected
                ));
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Twin profile + recommendations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinProfile {
    pub academic_level: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub learning_style: String,
}

/// Aggregates about "applicants like you". Synthesized by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinStats {
    pub found_count: u32,
    pub avg_score: f64,
    pub success_rate: String,
    pub similar_interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinRecommendation {
    pub uni_id: String,
    pub program_name: String,
    pub match_percentage: f64,
    pub grant_chance: f64,
    pub employment_chance: f64,
    pub salary_forecast: String,
    pub reason: String,
    pub risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinReport {
    pub twin_profile: TwinProfile,
    pub twin_stats: TwinStats,
    pub recommendations: Vec<TwinRecommendation>,
}

impl TwinReport {
    pub fn validate(&self, catalog: &Catalog) -> Result<(), String> {
        if self.recommendations.is_empty() {
            return Err("no recommendations".to_string());
        }
        check_range("twinStats.avgScore", self.twin_stats.avg_score, 140.0)?;
        for rec in &self.recommendations {
            if !catalog.contains_university(&rec.uni_id) {
                return Err(format!("unknown university id '{}'", rec.uni_id));
            }
            check_range("matchPercentage", rec.match_percentage, 100.0)?;
            check_range("grantChance", rec.grant_chance, 100.0)?;
            check_range("employmentChance", rec.employment_chance, 100.0)?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Portfolio strength report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub target: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub period: String,
    pub action: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileReport {
    /// 0..=100 profile strength.
    pub overall_score: f64,
    pub summary: String,
    pub gap_analysis: Vec<GapAnalysis>,
    pub roadmap: Vec<RoadmapStep>,
    pub essay_topics: Vec<String>,
}

impl ProfileReport {
    pub fn validate(&self) -> Result<(), String> {
        check_range("overallScore", self.overall_score, 100.0)?;
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        Ok(())
    }
}

fn check_range(field: &str, value: f64, max: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} = {value} is outside 0..={max}"))
    }
}
