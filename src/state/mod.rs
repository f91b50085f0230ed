use std::sync::Arc;

use crate::answer::AnswerGenerator;
use crate::core::config::{AppConfig, AppPaths, ConfigService};
use crate::core::security::{init_session_token, SessionToken};
use crate::llm::{CompletionProvider, EmbeddingProvider, OpenAiClient};
use crate::rag::{PineconeIndex, RetrievalDeadlines, VectorIndex, VectorRetriever};
use crate::session::{RagPipeline, SessionManager};

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// Provider clients are created once here and injected into the pipeline;
/// they live as long as the state and are dropped with it at shutdown.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: Arc<AppConfig>,
    pub session_token: SessionToken,
    pub sessions: SessionManager,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading and validating configuration
    /// 2. Checking that both provider keys and the index name are present
    /// 3. Building the OpenAI client and connecting to the vector index
    /// 4. Assembling the shared RAG pipeline
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config_service = ConfigService::new(paths.clone());
        let config = config_service.load_config()?;
        tracing::info!(
            "Loaded configuration from {}: {}",
            config_service.config_path().display(),
            config_service.redacted(&config)
        );

        let credentials = config
            .require_credentials()
            .map_err(InitializationError::MissingSetting)?;

        let openai = Arc::new(
            OpenAiClient::new(
                &config.openai.base_url,
                credentials.openai_api_key,
                config.openai.embedding_model.clone(),
                config.timeouts.connect(),
            )
            .map_err(InitializationError::Llm)?,
        );

        let index = PineconeIndex::connect(
            &config.vector_index,
            credentials.pinecone_api_key,
            config.timeouts.connect(),
            config.timeouts.query(),
        )
        .await
        .map_err(|source| InitializationError::VectorIndex {
            name: config.vector_index.name.clone(),
            source,
        })?;
        tracing::info!(
            "Connected to vector index '{}' at {}",
            config.vector_index.name,
            index.host_url()
        );

        let session_token = init_session_token(&paths);
        Ok(Self::from_parts(
            paths,
            config,
            session_token,
            openai.clone(),
            Arc::new(index),
            openai,
        ))
    }

    /// Wires the pipeline from already-constructed providers.
    pub fn from_parts(
        paths: Arc<AppPaths>,
        config: AppConfig,
        session_token: SessionToken,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Arc<Self> {
        let retriever = VectorRetriever::new(
            embedder,
            index,
            RetrievalDeadlines {
                embedding: config.timeouts.embedding(),
                query: config.timeouts.query(),
            },
        );
        let generator = AnswerGenerator::new(
            completion,
            config.openai.completion_model.clone(),
            config.timeouts.completion(),
        );
        let pipeline = Arc::new(RagPipeline::new(
            retriever,
            generator,
            config.retrieval.top_k,
        ));

        Arc::new(AppState {
            paths,
            config: Arc::new(config),
            session_token,
            sessions: SessionManager::new(pipeline),
        })
    }
}
