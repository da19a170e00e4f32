pub mod profession;
pub mod student;
pub mod university;

pub use profession::{Demand, Profession, Salary};
pub use student::{
    AchievementCategory, PortfolioItem, Review, ReviewRole, StudentProfile, UserProfile,
};
pub use university::{AcademicProgram, Degree, ProgramLanguage, University, UniversityCategory};
