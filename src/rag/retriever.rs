//! Vector retrieval: query text → embedding → nearest passages.
//!
//! Faults never leave this component. An embedding or index failure (including
//! a deadline breach) is logged, reported as a retrieval notice, and turns into
//! an empty result, which the orchestrator handles like "nothing found".

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::store::{IndexMatch, VectorIndex};
use super::types::{Query, RetrievalResult, RetrievedPassage, NO_ID, NO_TEXT};
use crate::core::errors::{with_deadline, ProviderError};
use crate::core::notice::{NoticeKind, Notices};
use crate::llm::EmbeddingProvider;

#[derive(Debug, Clone, Copy)]
pub struct RetrievalDeadlines {
    pub embedding: Duration,
    pub query: Duration,
}

pub struct VectorRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    deadlines: RetrievalDeadlines,
}

impl VectorRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        deadlines: RetrievalDeadlines,
    ) -> Self {
        Self {
            embedder,
            index,
            deadlines,
        }
    }

    /// Top `top_k` passages for `query`, in provider order. Never fails.
    pub async fn retrieve(
        &self,
        query: &Query,
        top_k: usize,
        notices: &mut Notices,
    ) -> RetrievalResult {
        match self.try_retrieve(query, top_k.max(1)).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    "Retrieval from index '{}' failed: {}",
                    self.index.name(),
                    err
                );
                notices.push(NoticeKind::Retrieval);
                Vec::new()
            }
        }
    }

    async fn try_retrieve(
        &self,
        query: &Query,
        top_k: usize,
    ) -> Result<RetrievalResult, ProviderError> {
        let vector = with_deadline(
            "embedding",
            self.deadlines.embedding,
            self.embedder.embed(query.as_str()),
        )
        .await?;

        if vector.is_empty() {
            return Err(ProviderError::EmptyResponse {
                provider: "embedding",
                what: "a vector",
            });
        }

        let matches = with_deadline(
            "vector query",
            self.deadlines.query,
            self.index.query(&vector, top_k, true),
        )
        .await?;

        let passages: RetrievalResult = matches
            .into_iter()
            .take(top_k)
            .map(passage_from_match)
            .collect();

        for passage in &passages {
            tracing::debug!(id = %passage.id, score = %passage.score, "retrieved passage");
        }

        Ok(passages)
    }
}

/// Applies the documented defaults for any field the match is missing.
pub fn passage_from_match(item: IndexMatch) -> RetrievedPassage {
    let text = match item.metadata.as_ref().and_then(|m| m.get("text")) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => NO_TEXT.to_string(),
        Some(other) => other.to_string(),
    };

    RetrievedPassage {
        id: item.id.unwrap_or_else(|| NO_ID.to_string()),
        score: item.score.into(),
        text,
    }
}
