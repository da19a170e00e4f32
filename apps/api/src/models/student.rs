use serde::{Deserialize, Serialize};

/// Quiz result. Replaced wholesale on every quiz submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// ENT score, 0..=140.
    pub score: u32,
    pub subject_pair: String,
    pub interests: Vec<String>,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementCategory {
    Olympiad,
    Sport,
    Volunteering,
    Certificate,
    Project,
    Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: String,
    pub title: String,
    pub category: AchievementCategory,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    /// Who awarded it, e.g. "British Council".
    pub issuer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(flatten)]
    pub quiz: UserProfile,
    pub name: String,
    /// School grade, 9..=12.
    pub grade: u8,
    /// 5.0 scale.
    pub gpa: f32,
    pub target_universities: Vec<String>,
    pub portfolio: Vec<PortfolioItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl StudentProfile {
    /// Profile seeded at login. Mirrors the sample data new users see before
    /// they fill anything in.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            quiz: UserProfile {
                score: 0,
                subject_pair: "Мат-Физ".to_string(),
                interests: Vec::new(),
                city: "Алматы".to_string(),
            },
            name: name.into(),
            grade: 11,
            gpa: 4.8,
            target_universities: Vec::new(),
            portfolio: vec![
                PortfolioItem {
                    id: "1".to_string(),
                    title: "IELTS 7.0".to_string(),
                    category: AchievementCategory::Certificate,
                    date: "2023-10-15".to_string(),
                    issuer: "British Council".to_string(),
                    description: None,
                },
                PortfolioItem {
                    id: "2".to_string(),
                    title: "Республиканская олимпиада по физике (2 место)".to_string(),
                    category: AchievementCategory::Olympiad,
                    date: "2024-03-20".to_string(),
                    issuer: "Дарын".to_string(),
                    description: None,
                },
            ],
            bio: Some(
                "Увлекаюсь робототехникой и программированием. Хочу поступить на Computer Science."
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewRole {
    Student,
    Alumni,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub role: ReviewRole,
    pub text: String,
    /// 1..=5 stars.
    pub rating: u8,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_profile_flattens_quiz_fields() {
        let profile = StudentProfile::with_name("Айгерим");
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["name"], "Айгерим");
        assert_eq!(value["subjectPair"], "Мат-Физ");
        assert_eq!(value["score"], 0);
        assert_eq!(value["portfolio"].as_array().unwrap().len(), 2);
        assert!(value.get("quiz").is_none());
    }
}
