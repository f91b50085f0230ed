//! Non-fatal, user-visible notices raised while a turn is processed.
//!
//! A component that absorbs a provider fault records one notice here instead
//! of returning an error. Notice text is fixed per kind so raw provider
//! messages never reach the user; the detail goes to the log.

use serde::Serialize;

pub const RETRIEVAL_NOTICE: &str = "An error occurred while searching the knowledge base.";
pub const GENERATION_NOTICE: &str = "An error occurred while generating the response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Retrieval,
    Generation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind) -> Self {
        let message = match kind {
            NoticeKind::Retrieval => RETRIEVAL_NOTICE,
            NoticeKind::Generation => GENERATION_NOTICE,
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

/// Notices collected during a single turn, in the order they were raised.
#[derive(Debug, Default, Clone)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NoticeKind) {
        self.items.push(Notice::new(kind));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Notice> {
        self.items
    }
}
