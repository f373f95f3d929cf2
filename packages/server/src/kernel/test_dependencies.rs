// TestDependencies - mock implementations for testing
//
// Provides a scripted AI provider and an in-memory store that can be injected
// into ServerDeps for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::ServerDeps;
use crate::domains::posts::classification::{
    ClassifierProvider, CredentialSource, PostClassifier, ProviderError,
};
use crate::domains::posts::models::{ExtractedEntities, PostType, RsvpVocabulary};
use crate::domains::posts::store::{InMemoryPostStore, PostStore};

// =============================================================================
// Mock Provider
// =============================================================================

/// Provider with scripted answers. Operations without an answer fail.
pub struct MockProvider {
    name: &'static str,
    credentials: CredentialSource,
    post_type: Option<PostType>,
    entities: Option<ExtractedEntities>,
    generated: Option<String>,
    calls: AtomicUsize,
    keys_seen: Mutex<Vec<String>>,
}

impl MockProvider {
    fn with_credentials(name: &'static str, credentials: CredentialSource) -> Self {
        Self {
            name,
            credentials,
            post_type: None,
            entities: None,
            generated: None,
            calls: AtomicUsize::new(0),
            keys_seen: Mutex::new(Vec::new()),
        }
    }

    /// Provider that only uses a server-configured key
    pub fn environment(name: &'static str, key: Option<&str>) -> Self {
        Self::with_credentials(name, CredentialSource::Environment(key.map(String::from)))
    }

    /// Provider that prefers the caller's key over the configured one
    pub fn request_or_environment(name: &'static str, key: Option<&str>) -> Self {
        Self::with_credentials(
            name,
            CredentialSource::RequestOrEnvironment(key.map(String::from)),
        )
    }

    pub fn classifies(mut self, post_type: PostType) -> Self {
        self.post_type = Some(post_type);
        self
    }

    pub fn extracts(mut self, entities: ExtractedEntities) -> Self {
        self.entities = Some(entities);
        self
    }

    pub fn generates(mut self, text: &str) -> Self {
        self.generated = Some(text.to_string());
        self
    }

    /// Fail every operation
    pub fn failing(mut self) -> Self {
        self.post_type = None;
        self.entities = None;
        self.generated = None;
        self
    }

    /// Number of operations invoked on this provider
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// API keys passed to this provider, in call order
    pub fn keys_seen(&self) -> Vec<String> {
        self.keys_seen
            .lock()
            .map(|keys| keys.clone())
            .unwrap_or_default()
    }

    fn record(&self, api_key: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut keys) = self.keys_seen.lock() {
            keys.push(api_key.to_string());
        }
    }

    fn answer<T: Clone>(&self, value: &Option<T>) -> Result<T, ProviderError> {
        value
            .clone()
            .ok_or_else(|| ProviderError::Request(format!("{} is scripted to fail", self.name)))
    }
}

#[async_trait]
impl ClassifierProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    async fn classify(&self, _content: &str, api_key: &str) -> Result<PostType, ProviderError> {
        self.record(api_key);
        self.answer(&self.post_type)
    }

    async fn extract_entities(
        &self,
        _content: &str,
        _post_type: PostType,
        api_key: &str,
    ) -> Result<ExtractedEntities, ProviderError> {
        self.record(api_key);
        self.answer(&self.entities)
    }

    async fn generate(&self, _prompt: &str, api_key: &str) -> Result<String, ProviderError> {
        self.record(api_key);
        self.answer(&self.generated)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub store: Arc<dyn PostStore>,
    pub providers: Vec<Arc<dyn ClassifierProvider>>,
    pub rsvp_vocabulary: RsvpVocabulary,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    /// In-memory store, no providers (heuristics only), default vocabulary
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryPostStore::new()),
            providers: Vec::new(),
            rsvp_vocabulary: RsvpVocabulary::default(),
        }
    }

    /// Append a provider to the fallback chain
    pub fn mock_provider(mut self, provider: Arc<MockProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn rsvp_vocabulary(mut self, vocabulary: RsvpVocabulary) -> Self {
        self.rsvp_vocabulary = vocabulary;
        self
    }

    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.store,
            PostClassifier::new(self.providers),
            self.rsvp_vocabulary,
        )
    }
}
