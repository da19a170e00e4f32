use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversityCategory {
    National,
    State,
    Private,
    Medical,
    Specialized,
}

impl UniversityCategory {
    pub const ALL: [UniversityCategory; 5] = [
        UniversityCategory::National,
        UniversityCategory::State,
        UniversityCategory::Private,
        UniversityCategory::Medical,
        UniversityCategory::Specialized,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    Bachelor,
    Master,
    PhD,
}

/// Instruction language used by the program-language filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramLanguage {
    Kz,
    Ru,
    En,
}

impl ProgramLanguage {
    pub const ALL: [ProgramLanguage; 3] =
        [ProgramLanguage::Kz, ProgramLanguage::Ru, ProgramLanguage::En];

    /// Canonical substrings looked for in a program's free-text language field.
    /// The field is lowercased before matching.
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            ProgramLanguage::En => &["english", "en"],
            ProgramLanguage::Ru => &["ru", "рус"],
            ProgramLanguage::Kz => &["kz", "каз"],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicProgram {
    pub name: String,
    pub degree: Degree,
    pub duration: String,
    /// Free text such as "English" or "KZ/RU/EN".
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition: Option<String>,
}

impl AcademicProgram {
    pub fn taught_in(&self, language: ProgramLanguage) -> bool {
        let field = self.language.to_lowercase();
        language.markers().iter().any(|m| field.contains(m))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleDegree {
    pub partner: String,
    pub program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: String,
    pub name: String,
    pub short_name: String,
    /// City, free text.
    pub location: String,
    pub description: String,
    pub founded: u32,
    /// Local ranking. Positive, not unique.
    pub ranking: u32,
    pub students: u32,
    /// Display string, e.g. "от 5 000 000 ₸".
    pub tuition_avg: String,
    pub mission: String,
    pub programs: Vec<AcademicProgram>,
    #[serde(default)]
    pub partners: Vec<String>,
    pub admission_deadlines: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<UniversityCategory>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub admission_requirements: Vec<String>,
    #[serde(default)]
    pub admission_procedure: Vec<String>,
    #[serde(default)]
    pub scholarships: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dormitory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub military_dept: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub double_degree: Vec<DoubleDegree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Contacts>,
}

impl University {
    /// Case-insensitive substring match on name, short name or any program name.
    /// `term` must already be lowercased. An empty term matches.
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty()
            || self.name.to_lowercase().contains(term)
            || self.short_name.to_lowercase().contains(term)
            || self
                .programs
                .iter()
                .any(|p| p.name.to_lowercase().contains(term))
    }

    pub fn offers_language(&self, language: ProgramLanguage) -> bool {
        self.programs.iter().any(|p| p.taught_in(language))
    }

    /// True if any program name contains any of the keywords, case-insensitively.
    pub fn has_program_matching<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        self.programs.iter().any(|p| {
            let name = p.name.to_lowercase();
            keywords
                .iter()
                .any(|k| name.contains(&k.as_ref().to_lowercase()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(name: &str, language: &str) -> AcademicProgram {
        AcademicProgram {
            name: name.to_string(),
            degree: Degree::Bachelor,
            duration: "4 года".to_string(),
            language: language.to_string(),
            description: None,
            tuition: None,
        }
    }

    #[test]
    fn test_language_markers_are_case_insensitive() {
        assert!(program("CS", "English").taught_in(ProgramLanguage::En));
        assert!(program("CS", "KZ/RU/EN").taught_in(ProgramLanguage::Kz));
        assert!(program("CS", "KZ/RU/EN").taught_in(ProgramLanguage::Ru));
        assert!(program("Право", "Казахский").taught_in(ProgramLanguage::Kz));
        assert!(program("Право", "Русский").taught_in(ProgramLanguage::Ru));
        assert!(!program("CS", "KZ/RU").taught_in(ProgramLanguage::En));
    }

    #[test]
    fn test_minimal_university_deserializes_with_defaults() {
        let json = r#"{
            "id": "x", "name": "X University", "shortName": "XU", "location": "Астана",
            "description": "", "founded": 2000, "ranking": 3, "students": 100,
            "tuitionAvg": "1 ₸", "mission": "", "programs": [], "admissionDeadlines": "01.08"
        }"#;
        let uni: University = serde_json::from_str(json).unwrap();
        assert_eq!(uni.short_name, "XU");
        assert!(uni.category.is_none());
        assert!(uni.achievements.is_empty());
        assert!(uni.matches_search(""));
        assert!(uni.matches_search("xu"));
        assert!(!uni.matches_search("kbtu"));
    }

    #[test]
    fn test_program_keyword_match() {
        let json = r#"{
            "id": "x", "name": "X", "shortName": "X", "location": "Алматы",
            "description": "", "founded": 2000, "ranking": 1, "students": 1,
            "tuitionAvg": "", "mission": "", "admissionDeadlines": "",
            "programs": [{"name": "Computer Science", "degree": "Bachelor", "duration": "4", "language": "EN"}]
        }"#;
        let uni: University = serde_json::from_str(json).unwrap();
        assert!(uni.has_program_matching(&["computer science"]));
        assert!(uni.has_program_matching(&["Software", "Computer"]));
        assert!(!uni.has_program_matching(&["Медицина"]));
    }
}
