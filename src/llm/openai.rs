use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::provider::{CompletionProvider, EmbeddingProvider};
use super::types::ChatRequest;
use crate::core::errors::ProviderError;
use crate::core::http::{build_client, status_error};

const PROVIDER: &str = "openai";

/// OpenAI-compatible client serving both chat completions and embeddings.
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    embedding_model: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: String,
        embedding_model: String,
        connect_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            embedding_model,
            client: build_client(PROVIDER, connect_timeout)?,
        })
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: ChatRequest, model_id: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": model_id,
            "messages": request.messages,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !res.status().is_success() {
            return Err(status_error(PROVIDER, res).await);
        }

        let payload: ChatResponse = res
            .json()
            .await
            .map_err(|e| ProviderError::decode(PROVIDER, e))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(ProviderError::EmptyResponse {
                provider: PROVIDER,
                what: "choices[0].message.content",
            })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let url = format!("{}/embeddings", self.base_url);

        let body = json!({
            "model": self.embedding_model,
            "input": [text],
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !res.status().is_success() {
            return Err(status_error(PROVIDER, res).await);
        }

        let payload: EmbeddingResponse = res
            .json()
            .await
            .map_err(|e| ProviderError::decode(PROVIDER, e))?;

        payload
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .filter(|vector| !vector.is_empty())
            .ok_or(ProviderError::EmptyResponse {
                provider: PROVIDER,
                what: "data[0].embedding",
            })
    }
}
