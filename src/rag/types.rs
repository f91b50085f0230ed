use std::fmt;

use serde::{Serialize, Serializer};

pub const NO_ID: &str = "No ID";
pub const NO_SCORE: &str = "No score";
pub const NO_TEXT: &str = "No text available";

/// The user's question for one turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Relevance reported by the index, in whatever range the provider uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassageScore {
    Value(f32),
    Missing,
}

impl PassageScore {
    pub fn value(&self) -> Option<f32> {
        match self {
            PassageScore::Value(v) => Some(*v),
            PassageScore::Missing => None,
        }
    }
}

impl From<Option<f32>> for PassageScore {
    fn from(score: Option<f32>) -> Self {
        score.map_or(PassageScore::Missing, PassageScore::Value)
    }
}

impl fmt::Display for PassageScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassageScore::Value(v) => write!(f, "{}", v),
            PassageScore::Missing => f.write_str(NO_SCORE),
        }
    }
}

impl Serialize for PassageScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PassageScore::Value(v) => serializer.serialize_f32(*v),
            PassageScore::Missing => serializer.serialize_str(NO_SCORE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedPassage {
    pub id: String,
    pub score: PassageScore,
    pub text: String,
}

/// Passages in provider order (descending score), at most `top_k` long.
pub type RetrievalResult = Vec<RetrievedPassage>;
