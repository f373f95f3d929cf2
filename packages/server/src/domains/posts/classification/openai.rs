use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use reqwest::Client;

use super::prompts::{
    self, CLASSIFY_MAX_TOKENS, CLASSIFY_SYSTEM_PROMPT, CLASSIFY_TEMPERATURE, EXTRACT_MAX_TOKENS,
    EXTRACT_TEMPERATURE, GENERATE_MAX_TOKENS, GENERATE_SYSTEM_PROMPT, GENERATE_TEMPERATURE,
};
use super::{ClassifierProvider, CredentialSource, ProviderError};
use crate::domains::posts::models::{ExtractedEntities, PostType};

/// OpenAI chat completions adapter.
///
/// Accepts a per-request key, falling back to the configured one.
pub struct OpenAIProvider {
    http: Client,
    model: String,
    credentials: CredentialSource,
    base_url: Option<String>,
}

impl OpenAIProvider {
    pub fn new(http: Client, model: impl Into<String>, default_key: Option<String>) -> Self {
        Self {
            http,
            model: model.into(),
            credentials: CredentialSource::RequestOrEnvironment(default_key),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn client(&self, api_key: &str) -> OpenAIClient {
        let client = OpenAIClient::new(api_key).with_http_client(self.http.clone());
        match &self.base_url {
            Some(url) => client.with_base_url(url.clone()),
            None => client,
        }
    }

    async fn complete(
        &self,
        api_key: &str,
        system: &str,
        user: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system))
            .message(Message::user(user))
            .max_tokens(max_tokens)
            .temperature(temperature);

        let response = self.client(api_key).chat_completion(request).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl ClassifierProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    async fn classify(&self, content: &str, api_key: &str) -> Result<PostType, ProviderError> {
        let answer = self
            .complete(
                api_key,
                CLASSIFY_SYSTEM_PROMPT,
                content.to_string(),
                CLASSIFY_MAX_TOKENS,
                CLASSIFY_TEMPERATURE,
            )
            .await?;

        Ok(PostType::from_model_output(&answer))
    }

    async fn extract_entities(
        &self,
        content: &str,
        post_type: PostType,
        api_key: &str,
    ) -> Result<ExtractedEntities, ProviderError> {
        let answer = self
            .complete(
                api_key,
                prompts::extraction_prompt(post_type),
                content.to_string(),
                EXTRACT_MAX_TOKENS,
                EXTRACT_TEMPERATURE,
            )
            .await?;

        prompts::parse_entities(&answer, post_type)
    }

    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, ProviderError> {
        let answer = self
            .complete(
                api_key,
                GENERATE_SYSTEM_PROMPT,
                prompts::generation_user_prompt(prompt),
                GENERATE_MAX_TOKENS,
                GENERATE_TEMPERATURE,
            )
            .await?;

        prompts::parse_generated(&answer)
    }
}
