use thiserror::Error;

use crate::core::errors::{ConfigError, ProviderError};

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required setting '{0}' (set it in secrets.yaml or the environment)")]
    MissingSetting(&'static str),

    #[error("Failed to initialize OpenAI client: {0}")]
    Llm(#[source] ProviderError),

    #[error("Failed to connect to vector index '{name}': {source}")]
    VectorIndex {
        name: String,
        #[source]
        source: ProviderError,
    },
}
