//! RAG (Retrieval-Augmented Generation) read path.
//!
//! This module provides:
//! - `VectorIndex`: abstract nearest-neighbour index, implemented by `PineconeIndex`
//! - `VectorRetriever`: embeds a query and fetches the top-k passages
//! - `assemble`: joins retrieved passages into a grounding context

mod context_builder;
pub mod pinecone;
pub mod retriever;
pub mod store;
pub mod types;

pub use context_builder::{assemble, GroundingContext};
pub use pinecone::PineconeIndex;
pub use retriever::{RetrievalDeadlines, VectorRetriever};
pub use store::{IndexMatch, VectorIndex};
pub use types::{PassageScore, Query, RetrievalResult, RetrievedPassage};
