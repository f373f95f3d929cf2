use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::domains::posts::models::RsvpVocabulary;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Absent means the in-memory store
    pub database_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Default for callers that don't send their own key
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub provider_timeout: Duration,
    pub rsvp_vocabulary: RsvpVocabulary,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            port: var("PORT")
                .map(|p| p.parse())
                .transpose()
                .context("PORT must be a valid number")?
                .unwrap_or(DEFAULT_PORT),
            database_url: var("DATABASE_URL"),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            provider_timeout: Duration::from_secs(
                var("PROVIDER_TIMEOUT_SECS")
                    .map(|s| s.parse())
                    .transpose()
                    .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
            ),
            rsvp_vocabulary: var("RSVP_VOCABULARY")
                .map(|v| v.parse())
                .transpose()
                .context("RSVP_VOCABULARY must be 'interested' or 'maybe'")?
                .unwrap_or_default(),
        })
    }
}
