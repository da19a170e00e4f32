use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::advisor::cache::DEFAULT_CAPACITY;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Missing key is allowed: every AI call then fails and takes the
    /// fallback path.
    pub gemini_api_key: Option<String>,
    pub llm_timeout_secs: u64,
    pub ai_cache_enabled: bool,
    /// Entries kept per AI cache before the least recently used is dropped.
    pub ai_cache_capacity: usize,
    /// Sessions idle longer than this are evicted.
    pub session_ttl_secs: u64,
    pub logout: LogoutPolicy,
    pub catalog_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

/// Which overlay lists survive logout. Auth, selection, quiz and student
/// profile are always reset. Whether favorites and comparison are
/// device-level or account-level is an open product decision, so both are
/// configurable; the defaults keep them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogoutPolicy {
    pub clear_comparison: bool,
    pub clear_saved: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            ai_cache_enabled: parse_env("AI_CACHE_ENABLED", true)?,
            ai_cache_capacity: parse_env("AI_CACHE_CAPACITY", DEFAULT_CAPACITY)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", 3600)?,
            logout: LogoutPolicy {
                clear_comparison: parse_env("LOGOUT_CLEARS_COMPARISON", false)?,
                clear_saved: parse_env("LOGOUT_CLEARS_SAVED", false)?,
            },
            catalog_dir: std::env::var("CATALOG_DIR").ok().map(PathBuf::from),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            llm_timeout_secs: 120,
            ai_cache_enabled: true,
            ai_cache_capacity: DEFAULT_CAPACITY,
            session_ttl_secs: 3600,
            logout: LogoutPolicy::default(),
            catalog_dir: None,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_missing() {
        let value: u16 = parse_env("DATAHUB_TEST_SURELY_UNSET_VAR", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("DATAHUB_TEST_BAD_BOOL", "maybe");
        let result: Result<bool> = parse_env("DATAHUB_TEST_BAD_BOOL", false);
        assert!(result.is_err());
        std::env::remove_var("DATAHUB_TEST_BAD_BOOL");
    }

    #[test]
    fn test_default_logout_policy_keeps_lists() {
        let policy = LogoutPolicy::default();
        assert!(!policy.clear_comparison);
        assert!(!policy.clear_saved);
    }
}
