//! Post classification: heuristic rules, AI provider adapters and the
//! fallback chain that ties them together.
//!
//! Provider adapters only translate between the domain and one external API.
//! They never fall back on their own; `PostClassifier` decides what runs next.

pub mod gemini;
pub mod heuristic;
pub mod openai;
pub mod orchestrator;
pub mod prompts;

pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;
pub use orchestrator::PostClassifier;

use async_trait::async_trait;
use thiserror::Error;

use crate::domains::posts::models::{ExtractedEntities, PostType};

/// Failure of a single provider call. Always absorbed by the orchestrator.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure, timeout, or non-2xx answer
    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("could not parse provider response: {0}")]
    Parse(String),
}

impl From<openai_client::OpenAIError> for ProviderError {
    fn from(err: openai_client::OpenAIError) -> Self {
        match err {
            openai_client::OpenAIError::Parse(msg) => ProviderError::Parse(msg),
            other => ProviderError::Request(other.to_string()),
        }
    }
}

impl From<gemini_client::GeminiError> for ProviderError {
    fn from(err: gemini_client::GeminiError) -> Self {
        match err {
            gemini_client::GeminiError::Parse(msg) => ProviderError::Parse(msg),
            other => ProviderError::Request(other.to_string()),
        }
    }
}

/// Where a provider gets its API key from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Server-configured key only; per-request keys are ignored.
    Environment(Option<String>),
    /// Per-request key when given, else the server-configured default.
    RequestOrEnvironment(Option<String>),
}

impl CredentialSource {
    /// Resolve the key for one call. Blank keys count as absent.
    pub fn resolve(&self, request_key: Option<&str>) -> Option<String> {
        let request_key = non_blank(request_key);
        match self {
            CredentialSource::Environment(env) => non_blank(env.as_deref()),
            CredentialSource::RequestOrEnvironment(env) => {
                request_key.or_else(|| non_blank(env.as_deref()))
            }
        }
    }
}

fn non_blank(key: Option<&str>) -> Option<String> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

/// One external AI service able to classify, extract and generate.
///
/// Each operation makes exactly one network call.
#[async_trait]
pub trait ClassifierProvider: Send + Sync {
    /// Short name used in logs ("gemini", "openai").
    fn name(&self) -> &'static str;

    fn credentials(&self) -> &CredentialSource;

    /// Classify content. Unrecognised answers map to `Announcement`.
    async fn classify(&self, content: &str, api_key: &str) -> Result<PostType, ProviderError>;

    async fn extract_entities(
        &self,
        content: &str,
        post_type: PostType,
        api_key: &str,
    ) -> Result<ExtractedEntities, ProviderError>;

    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, ProviderError>;
}
