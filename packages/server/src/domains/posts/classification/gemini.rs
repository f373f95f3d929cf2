use async_trait::async_trait;
use gemini_client::{GeminiClient, GenerateContentRequest};
use reqwest::Client;

use super::prompts::{
    self, CLASSIFY_MAX_TOKENS, CLASSIFY_SYSTEM_PROMPT, CLASSIFY_TEMPERATURE, EXTRACT_MAX_TOKENS,
    EXTRACT_TEMPERATURE, GENERATE_MAX_TOKENS, GENERATE_SYSTEM_PROMPT, GENERATE_TEMPERATURE,
};
use super::{ClassifierProvider, CredentialSource, ProviderError};
use crate::domains::posts::models::{ExtractedEntities, PostType};

/// Gemini `generateContent` adapter.
///
/// Uses the server-configured key only.
pub struct GeminiProvider {
    http: Client,
    model: String,
    credentials: CredentialSource,
    base_url: Option<String>,
}

impl GeminiProvider {
    pub fn new(http: Client, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            model: model.into(),
            credentials: CredentialSource::Environment(api_key),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn client(&self, api_key: &str) -> GeminiClient {
        let client = GeminiClient::new(api_key).with_http_client(self.http.clone());
        match &self.base_url {
            Some(url) => client.with_base_url(url.clone()),
            None => client,
        }
    }

    async fn generate_text(
        &self,
        api_key: &str,
        request: GenerateContentRequest,
    ) -> Result<String, ProviderError> {
        Ok(self.client(api_key).generate_text(&self.model, request).await?)
    }
}

#[async_trait]
impl ClassifierProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    async fn classify(&self, content: &str, api_key: &str) -> Result<PostType, ProviderError> {
        let request = GenerateContentRequest::new()
            .system(CLASSIFY_SYSTEM_PROMPT)
            .user(content)
            .max_output_tokens(CLASSIFY_MAX_TOKENS)
            .temperature(CLASSIFY_TEMPERATURE);

        let answer = self.generate_text(api_key, request).await?;
        Ok(PostType::from_model_output(&answer))
    }

    async fn extract_entities(
        &self,
        content: &str,
        post_type: PostType,
        api_key: &str,
    ) -> Result<ExtractedEntities, ProviderError> {
        let request = GenerateContentRequest::new()
            .system(prompts::extraction_prompt(post_type))
            .user(content)
            .max_output_tokens(EXTRACT_MAX_TOKENS)
            .temperature(EXTRACT_TEMPERATURE)
            .json_response();

        let answer = self.generate_text(api_key, request).await?;
        prompts::parse_entities(&answer, post_type)
    }

    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::new()
            .system(GENERATE_SYSTEM_PROMPT)
            .user(prompts::generation_user_prompt(prompt))
            .max_output_tokens(GENERATE_MAX_TOKENS)
            .temperature(GENERATE_TEMPERATURE);

        let answer = self.generate_text(api_key, request).await?;
        prompts::parse_generated(&answer)
    }
}
