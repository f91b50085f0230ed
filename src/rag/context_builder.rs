//! Grounding context assembly.
//!
//! Joins the passage texts in rank order with a newline. No scoring, no
//! reordering and no truncation happen here: ranking belongs to the index.

use std::fmt;

use super::types::RetrievedPassage;

/// Retrieved text handed verbatim to the generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingContext(String);

impl GroundingContext {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroundingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `None` for an empty result; that is the orchestrator's cue for the degraded path.
pub fn assemble(result: &[RetrievedPassage]) -> Option<GroundingContext> {
    if result.is_empty() {
        return None;
    }

    let texts: Vec<&str> = result.iter().map(|p| p.text.as_str()).collect();
    Some(GroundingContext(texts.join("\n")))
}
