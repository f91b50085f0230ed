use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::orchestrator::{RagPipeline, SessionOrchestrator};

/// A session's orchestrator. The mutex serialises its turns.
pub type SharedSession = Arc<Mutex<SessionOrchestrator>>;

/// In-memory registry of live sessions. Nothing is persisted; deleting a
/// session drops its history.
#[derive(Clone)]
pub struct SessionManager {
    pipeline: Arc<RagPipeline>,
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionManager {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self {
            pipeline,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(SessionOrchestrator::new(self.pipeline.clone())));
        self.sessions.write().await.insert(id, session);
        tracing::info!("Created session {}", id);
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!("Deleted session {}", id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
