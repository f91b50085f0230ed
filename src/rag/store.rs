//! VectorIndex trait: abstract interface over the nearest-neighbour index.
//!
//! The index is populated elsewhere; this crate only reads from it. The
//! primary implementation is `PineconeIndex` in the `pinecone` module.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::errors::ProviderError;

/// One raw match as returned by the index. Every field is optional on the
/// wire; defaults are applied by the retriever, not here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IndexMatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    fn name(&self) -> &str;

    /// Nearest neighbours of `vector`, best first, at most `top_k`.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<IndexMatch>, ProviderError>;
}
