//! Orientation quiz: four steps (ENT score, subject pair, city, interests)
//! folded into a `UserProfile`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::UserProfile;

pub const MAX_SCORE: u32 = 140;
pub const MAX_INTERESTS: usize = 3;
/// Stored city when the applicant picks "any city".
pub const ANY_CITY: &str = "Не важно";

pub const SUBJECT_PAIRS: &[&str] = &[
    "Мат-Физ",
    "Био-Хим",
    "География-Мат",
    "Всемирная-Английский",
    "География-Биология",
    "Русский-Литература",
    "Творческий",
];

pub const INTERESTS: &[&str] = &[
    "IT & Technologies",
    "Медицина",
    "Инженерия",
    "Педагогика",
    "Бизнес & Финансы",
    "Право",
    "Творчество & Дизайн",
    "Наука",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub score: u32,
    pub subject_pair: String,
    pub interests: Vec<String>,
    /// `None` means any city.
    #[serde(default)]
    pub city: Option<String>,
}

impl QuizSubmission {
    pub fn into_profile(self, catalog: &Catalog) -> Result<UserProfile, String> {
        if self.score > MAX_SCORE {
            return Err(format!("score must be within 0..={MAX_SCORE}"));
        }
        if !SUBJECT_PAIRS.contains(&self.subject_pair.as_str()) {
            return Err(format!("unknown subject pair '{}'", self.subject_pair));
        }

        let city = match self.city.as_deref().map(str::trim) {
            None | Some(ANY_CITY) => ANY_CITY.to_string(),
            Some("") => return Err("city must not be empty".to_string()),
            Some(city) if catalog.cities().iter().any(|c| c == city) => city.to_string(),
            Some(city) => return Err(format!("unknown city '{city}'")),
        };

        if self.interests.is_empty() || self.interests.len() > MAX_INTERESTS {
            return Err(format!("pick between 1 and {MAX_INTERESTS} interests"));
        }
        let mut seen = HashSet::new();
        for interest in &self.interests {
            if !INTERESTS.contains(&interest.as_str()) {
                return Err(format!("unknown interest '{interest}'"));
            }
            if !seen.insert(interest.as_str()) {
                return Err(format!("interest '{interest}' listed twice"));
            }
        }

        Ok(UserProfile {
            score: self.score,
            subject_pair: self.subject_pair,
            interests: self.interests,
            city,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> QuizSubmission {
        QuizSubmission {
            score: 95,
            subject_pair: "Мат-Физ".to_string(),
            interests: vec!["IT & Technologies".to_string()],
            city: Some("Алматы".to_string()),
        }
    }

    #[test]
    fn test_valid_submission_keeps_fields() {
        let catalog = Catalog::embedded().unwrap();
        let profile = submission().into_profile(&catalog).unwrap();
        assert_eq!(profile.score, 95);
        assert_eq!(profile.subject_pair, "Мат-Физ");
        assert_eq!(profile.interests, vec!["IT & Technologies".to_string()]);
        assert_eq!(profile.city, "Алматы");
    }

    #[test]
    fn test_any_city() {
        let catalog = Catalog::embedded().unwrap();
        let mut sub = submission();
        sub.city = None;
        assert_eq!(sub.into_profile(&catalog).unwrap().city, ANY_CITY);
    }

    #[test]
    fn test_score_above_max_rejected() {
        let catalog = Catalog::embedded().unwrap();
        let mut sub = submission();
        sub.score = 141;
        assert!(sub.into_profile(&catalog).is_err());
    }

    #[test]
    fn test_interest_limits() {
        let catalog = Catalog::embedded().unwrap();
        let mut sub = submission();
        sub.interests = vec![];
        assert!(sub.clone().into_profile(&catalog).is_err());

        sub.interests = INTERESTS[..4].iter().map(|s| s.to_string()).collect();
        assert!(sub.clone().into_profile(&catalog).is_err());

        sub.interests = vec!["Право".into(), "Право".into()];
        assert!(sub.into_profile(&catalog).is_err());
    }

    #[test]
    fn test_unknown_subject_pair_and_city_rejected() {
        let catalog = Catalog::embedded().unwrap();
        let mut sub = submission();
        sub.subject_pair = "Химия-Физкультура".into();
        assert!(sub.into_profile(&catalog).is_err());

        let mut sub = submission();
        sub.city = Some("Париж".into());
        assert!(sub.into_profile(&catalog).is_err());
    }
}
