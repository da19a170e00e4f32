use crate::catalog::Catalog;
use crate::models::{Profession, University};

/// Universities offering at least one program whose name contains one of the
/// profession's keywords (case-insensitive substring, no fuzzy matching).
pub fn universities_for_profession<'a>(
    catalog: &'a Catalog,
    profession: &Profession,
) -> Vec<&'a University> {
    catalog
        .universities()
        .iter()
        .filter(|u| u.has_program_matching(&profession.program_keywords))
        .collect()
}
