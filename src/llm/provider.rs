use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::ProviderError;

/// Chat-completion capability.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// request one completion and return its message content
    async fn complete(&self, request: ChatRequest, model_id: &str) -> Result<String, ProviderError>;
}

/// Text embedding capability. The model, and with it the vector
/// dimensionality, is fixed when the provider is constructed.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}
