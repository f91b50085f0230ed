use std::sync::Arc;
use std::time::Duration;

use super::prompt::build_messages;
use crate::core::errors::with_deadline;
use crate::core::notice::{NoticeKind, Notices};
use crate::llm::{ChatRequest, CompletionProvider};
use crate::rag::{GroundingContext, Query};

pub const FALLBACK_ANSWER: &str = "I apologize, but I encountered an error while processing your question. Could you please try asking again?";

/// Produces the grounded answer for one turn.
pub struct AnswerGenerator {
    provider: Arc<dyn CompletionProvider>,
    model_id: String,
    deadline: Duration,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, model_id: String, deadline: Duration) -> Self {
        Self {
            provider,
            model_id,
            deadline,
        }
    }

    /// Always returns an answer: the trimmed completion, or [`FALLBACK_ANSWER`]
    /// plus a generation notice when the provider fails.
    pub async fn generate(
        &self,
        query: &Query,
        context: &GroundingContext,
        notices: &mut Notices,
    ) -> String {
        let request = ChatRequest::new(build_messages(query, context));

        let result = with_deadline(
            "completion",
            self.deadline,
            self.provider.complete(request, &self.model_id),
        )
        .await;

        match result {
            Ok(content) => content.trim().to_string(),
            Err(err) => {
                tracing::warn!(
                    "Completion with {} model '{}' failed: {}",
                    self.provider.name(),
                    self.model_id,
                    err
                );
                notices.push(NoticeKind::Generation);
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}
