use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{heuristic, prompts, ClassifierProvider, ProviderError};
use crate::domains::posts::models::{ExtractedEntities, PostType};

/// Ordered provider fallback chain with the heuristic rules as the last tier.
///
/// Providers are tried one at a time in list order. A provider whose
/// credential resolves to nothing is skipped without a call; a failed call is
/// logged and the next tier runs. No operation here ever returns an error.
#[derive(Clone)]
pub struct PostClassifier {
    providers: Vec<Arc<dyn ClassifierProvider>>,
}

impl PostClassifier {
    pub fn new(providers: Vec<Arc<dyn ClassifierProvider>>) -> Self {
        Self { providers }
    }

    /// A classifier that always answers from the heuristic rules.
    pub fn heuristic_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn detect_post_type(&self, content: &str, api_key: Option<&str>) -> PostType {
        let answer = self
            .first_success("classify", api_key, |provider, key| async move {
                provider.classify(content, &key).await
            })
            .await;

        answer.unwrap_or_else(|| {
            debug!(tier = "heuristic", "Post type from heuristic rules");
            heuristic::classify(content)
        })
    }

    pub async fn extract_entities(
        &self,
        content: &str,
        post_type: PostType,
        api_key: Option<&str>,
    ) -> ExtractedEntities {
        let answer = self
            .first_success("extract", api_key, |provider, key| async move {
                provider.extract_entities(content, post_type, &key).await
            })
            .await;

        // A provider answering for the wrong type would break the metadata invariant
        match answer {
            Some(entities) if entities.post_type() == post_type => entities,
            _ => {
                debug!(tier = "heuristic", "Entities from heuristic rules");
                heuristic::extract(content, post_type)
            }
        }
    }

    pub async fn generate_post(&self, prompt: &str, api_key: Option<&str>) -> String {
        let answer = self
            .first_success("generate", api_key, |provider, key| async move {
                provider.generate(prompt, &key).await
            })
            .await;

        answer.unwrap_or_else(|| {
            debug!(tier = "template", "Generated post from template");
            prompts::fallback_post(prompt)
        })
    }

    async fn first_success<'a, T, F, Fut>(
        &'a self,
        operation: &'static str,
        api_key: Option<&str>,
        call: F,
    ) -> Option<T>
    where
        F: Fn(&'a dyn ClassifierProvider, String) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        for provider in &self.providers {
            let Some(key) = provider.credentials().resolve(api_key) else {
                debug!(provider = provider.name(), operation, "Skipping provider without credential");
                continue;
            };

            match call(provider.as_ref(), key).await {
                Ok(value) => {
                    debug!(provider = provider.name(), operation, "Provider answered");
                    return Some(value);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        operation,
                        error = %e,
                        "Provider failed, falling back"
                    );
                }
            }
        }

        None
    }
}
