//! AI Gateway: turns catalog records and applicant profiles into prompts,
//! sends them through a [`GenerativeModel`] and validates the structured
//! replies against the report schemas.

pub mod cache;
pub mod handlers;
pub mod jobs;
pub mod prompts;
pub mod schema;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::i18n::{t, Language, Message};
use crate::llm_client::{strip_json_fences, GenerateRequest, GenerativeModel, LlmError};
use crate::models::{StudentProfile, UserProfile};

use cache::{fingerprint, id_set_key, ResponseCache};
use schema::{ComparisonReport, ProfileReport, TwinReport};

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("AI request failed: {0}")]
    Transport(#[from] LlmError),

    #[error("AI response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("AI response has an unexpected shape: {0}")]
    Shape(String),

    #[error("{0}")]
    Input(String),
}

pub struct Advisor {
    model: Arc<dyn GenerativeModel>,
    catalog: Arc<Catalog>,
    /// Advisor persona with the catalog digest baked in.
    system: String,
    comparisons: ResponseCache<ComparisonReport>,
    guidance: ResponseCache<TwinReport>,
    portfolios: ResponseCache<ProfileReport>,
}

impl Advisor {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        catalog: Arc<Catalog>,
        cache_enabled: bool,
        cache_capacity: usize,
    ) -> Self {
        let system = prompts::advisor_system(&catalog);
        Self {
            model,
            catalog,
            system,
            comparisons: ResponseCache::new(cache_enabled, cache_capacity),
            guidance: ResponseCache::new(cache_enabled, cache_capacity),
            portfolios: ResponseCache::new(cache_enabled, cache_capacity),
        }
    }

    /// Single-turn chat. Never fails: provider errors become a localized
    /// apology the transcript can show as a model message.
    pub async fn chat(&self, message: &str, lang: Language) -> String {
        debug!("Chat request ({} chars)", message.chars().count());
        let request = GenerateRequest::text(message).with_system(&self.system);
        match self.model.generate(request).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => t(lang, Message::ChatEmptyReply).to_string(),
            Err(e) => {
                error!("Chat request failed: {e}");
                t(lang, Message::ChatUnavailable).to_string()
            }
        }
    }

    pub async fn compare(
        &self,
        ids: &[String],
        lang: Language,
    ) -> Result<ComparisonReport, AdvisorError> {
        let universities = self.catalog.universities_by_ids(ids);
        if universities.len() != ids.len() || universities.len() < 2 {
            return Err(AdvisorError::Input(format!(
                "comparison needs at least 2 known universities, got {ids:?}"
            )));
        }
        let prompt = prompts::comparison_prompt(&universities, lang);
        let key = format!("{}:{}", lang.code(), id_set_key(ids));

        self.comparisons
            .get_or_try_fetch(key, || async {
                info!("Requesting comparison of {}", ids.join(", "));
                let raw = self.model.generate(GenerateRequest::json(&prompt)).await?;
                let report: ComparisonReport = parse(&raw)?;
                report.validate(ids).map_err(AdvisorError::Shape)?;
                Ok::<_, AdvisorError>(report)
            })
            .await
    }

    pub async fn guidance(
        &self,
        profile: &UserProfile,
        lang: Language,
    ) -> Result<TwinReport, AdvisorError> {
        let prompt = prompts::guidance_prompt(profile, &self.catalog, lang);
        let key = format!("{}:{}", lang.code(), fingerprint(profile));

        self.guidance
            .get_or_try_fetch(key, || async {
                info!(
                    "Requesting guidance for score {} ({})",
                    profile.score, profile.subject_pair
                );
                let request = GenerateRequest::json(&prompt).with_system(&self.system);
                let raw = self.model.generate(request).await?;
                let report: TwinReport = parse(&raw)?;
                report.validate(&self.catalog).map_err(AdvisorError::Shape)?;
                Ok::<_, AdvisorError>(report)
            })
            .await
    }

    pub async fn analyze_portfolio(
        &self,
        student: &StudentProfile,
        lang: Language,
    ) -> Result<ProfileReport, AdvisorError> {
        let prompt = prompts::portfolio_prompt(student, &self.catalog, lang);
        let key = format!("{}:{}", lang.code(), fingerprint(student));

        self.portfolios
            .get_or_try_fetch(key, || async {
                info!(
                    "Requesting portfolio analysis ({} items)",
                    student.portfolio.len()
                );
                let request = GenerateRequest::json(&prompt).with_system(prompts::PORTFOLIO_SYSTEM);
                let raw = self.model.generate(request).await?;
                let report: ProfileReport = parse(&raw)?;
                report.validate().map_err(AdvisorError::Shape)?;
                Ok::<_, AdvisorError>(report)
            })
            .await
    }
}

fn parse<T: DeserializeOwned>(raw: &str) -> Result<T, AdvisorError> {
    Ok(serde_json::from_str(strip_json_fences(raw))?)
}
