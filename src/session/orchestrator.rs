//! Per-session turn driver.
//!
//! One turn runs to completion before the next one starts:
//!
//! ```text
//! Idle -> AwaitingRetrieval -> AwaitingGeneration -> Idle   (passages found)
//! Idle -> AwaitingRetrieval -> Idle                         (nothing found)
//! ```
//!
//! Components absorb their own faults, so every turn appends exactly one user
//! turn followed by exactly one assistant turn.

use std::sync::Arc;

use serde::Serialize;

use super::history::{ConversationHistory, Turn};
use crate::answer::AnswerGenerator;
use crate::core::notice::{Notice, Notices};
use crate::rag::{assemble, PassageScore, Query, RetrievedPassage, VectorRetriever};

pub const NO_RESULTS_MESSAGE: &str = "I'm sorry, but I couldn't find any relevant information to answer your question. Could you please rephrase or ask a different question?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    AwaitingRetrieval,
    AwaitingGeneration,
}

/// Long-lived collaborators shared by every session.
pub struct RagPipeline {
    retriever: VectorRetriever,
    generator: AnswerGenerator,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(retriever: VectorRetriever, generator: AnswerGenerator, top_k: usize) -> Self {
        Self {
            retriever,
            generator,
            top_k,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    pub id: String,
    pub score: PassageScore,
}

impl From<&RetrievedPassage> for SourceRef {
    fn from(passage: &RetrievedPassage) -> Self {
        Self {
            id: passage.id.clone(),
            score: passage.score,
        }
    }
}

/// What one turn added, for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub turns: Vec<Turn>,
    pub notices: Vec<Notice>,
    pub sources: Vec<SourceRef>,
}

impl TurnOutcome {
    pub fn answer(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

pub struct SessionOrchestrator {
    pipeline: Arc<RagPipeline>,
    history: ConversationHistory,
    state: TurnState,
}

impl SessionOrchestrator {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self {
            pipeline,
            history: ConversationHistory::new(),
            state: TurnState::Idle,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub async fn handle_turn(&mut self, input: impl Into<String>) -> TurnOutcome {
        let start = self.history.len();
        let query = Query::new(input);
        let mut notices = Notices::new();

        self.history.append(Turn::user(query.as_str()));
        self.transition(TurnState::AwaitingRetrieval);

        let result = self
            .pipeline
            .retriever
            .retrieve(&query, self.pipeline.top_k, &mut notices)
            .await;

        let (answer, sources) = match assemble(&result) {
            Some(context) => {
                self.transition(TurnState::AwaitingGeneration);
                let answer = self
                    .pipeline
                    .generator
                    .generate(&query, &context, &mut notices)
                    .await;
                (answer, result.iter().map(SourceRef::from).collect())
            }
            None => {
                tracing::info!("No passages retrieved; answering with the rephrase message");
                (NO_RESULTS_MESSAGE.to_string(), Vec::new())
            }
        };

        self.history.append(Turn::assistant(answer));
        self.transition(TurnState::Idle);

        TurnOutcome {
            turns: self.history.since(start).to_vec(),
            notices: notices.into_vec(),
            sources,
        }
    }

    fn transition(&mut self, next: TurnState) {
        tracing::debug!(from = ?self.state, to = ?next, "turn state");
        self.state = next;
    }
}
