pub mod history;
pub mod manager;
pub mod orchestrator;

pub use history::{ConversationHistory, Role, Turn};
pub use manager::{SessionManager, SharedSession};
pub use orchestrator::{
    RagPipeline, SessionOrchestrator, SourceRef, TurnOutcome, TurnState, NO_RESULTS_MESSAGE,
};
