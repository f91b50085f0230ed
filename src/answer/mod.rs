//! Answer generation: prompt assembly and the completion call.

pub mod generator;
pub mod prompt;

pub use generator::{AnswerGenerator, FALLBACK_ANSWER};
