//! Retrieval-augmented probability and statistics assistant.
//!
//! A question is embedded, matched against a vector index of reference
//! passages, and answered by a chat-completion model grounded on the
//! passages it found. Sessions keep the conversation history in memory.

pub mod answer;
pub mod core;
pub mod llm;
pub mod notation;
pub mod rag;
pub mod server;
pub mod session;
pub mod state;
