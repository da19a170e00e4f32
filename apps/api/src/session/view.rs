use serde::{Deserialize, Serialize};

/// Named screens of the application. `Landing` gates all the others until
/// login succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Landing,
    Home,
    Professions,
    Details,
    ProfessionDetails,
    Compare,
    Guidance,
    Profile,
}

/// Destinations reachable through navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavTarget {
    Home,
    Professions,
    Compare,
    Guidance,
    Profile,
}

impl From<NavTarget> for View {
    fn from(target: NavTarget) -> Self {
        match target {
            NavTarget::Home => View::Home,
            NavTarget::Professions => View::Professions,
            NavTarget::Compare => View::Compare,
            NavTarget::Guidance => View::Guidance,
            NavTarget::Profile => View::Profile,
        }
    }
}
