//! Typed view of the merged configuration tree.
//!
//! Every field has a serde default so a partial `config.yml` (or none at all)
//! still deserialises; secrets stay `None` until overlaid from the environment
//! or `secrets.yaml`, and are checked by [`AppConfig::require_credentials`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub vector_index: VectorIndexSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub app: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "defaults::openai_base_url")]
    pub base_url: String,
    #[serde(default = "defaults::completion_model")]
    pub completion_model: String,
    #[serde(default = "defaults::embedding_model")]
    pub embedding_model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::openai_base_url(),
            completion_model: defaults::completion_model(),
            embedding_model: defaults::embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "defaults::index_name")]
    pub name: String,
    /// Data-plane host; resolved from the control plane when absent.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "defaults::control_plane_url")]
    pub control_plane_url: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default = "defaults::pinecone_api_version")]
    pub api_version: String,
}

impl Default for VectorIndexSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            name: defaults::index_name(),
            host: None,
            control_plane_url: defaults::control_plane_url(),
            namespace: None,
            api_version: defaults::pinecone_api_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default = "defaults::top_k")]
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: defaults::top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutSettings {
    #[serde(default = "defaults::embedding_timeout_secs")]
    pub embedding_secs: u64,
    #[serde(default = "defaults::query_timeout_secs")]
    pub query_secs: u64,
    #[serde(default = "defaults::completion_timeout_secs")]
    pub completion_secs: u64,
    #[serde(default = "defaults::connect_timeout_secs")]
    pub connect_secs: u64,
}

impl TimeoutSettings {
    pub fn embedding(&self) -> Duration {
        Duration::from_secs(self.embedding_secs)
    }

    pub fn query(&self) -> Duration {
        Duration::from_secs(self.query_secs)
    }

    pub fn completion(&self) -> Duration {
        Duration::from_secs(self.completion_secs)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            embedding_secs: defaults::embedding_timeout_secs(),
            query_secs: defaults::query_timeout_secs(),
            completion_secs: defaults::completion_timeout_secs(),
            connect_secs: defaults::connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "defaults::server_host")]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: defaults::server_host(),
            port: 0,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "defaults::max_input_length")]
    pub max_input_length: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_input_length: defaults::max_input_length(),
        }
    }
}

/// Credentials every process needs before it may serve a single turn.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub pinecone_api_key: String,
}

impl AppConfig {
    /// Returns the provider keys, or the name of the first missing setting.
    pub fn require_credentials(&self) -> Result<Credentials, &'static str> {
        let openai_api_key = non_blank(self.openai.api_key.as_deref()).ok_or("openai.api_key")?;
        let pinecone_api_key =
            non_blank(self.vector_index.api_key.as_deref()).ok_or("vector_index.api_key")?;
        if self.vector_index.name.trim().is_empty() {
            return Err("vector_index.name");
        }
        Ok(Credentials {
            openai_api_key: openai_api_key.to_string(),
            pinecone_api_key: pinecone_api_key.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_deserialises_to_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({})).unwrap();

        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.openai.completion_model, "gpt-4o");
        assert_eq!(config.vector_index.name, "mathindex");
        assert_eq!(config.timeouts.completion(), Duration::from_secs(120));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.app.max_input_length, 4000);
    }

    #[test]
    fn missing_keys_are_reported_by_name() {
        let mut config = AppConfig::default();
        assert_eq!(config.require_credentials().unwrap_err(), "openai.api_key");

        config.openai.api_key = Some("sk-test".to_string());
        config.vector_index.api_key = Some("   ".to_string());
        assert_eq!(
            config.require_credentials().unwrap_err(),
            "vector_index.api_key"
        );

        config.vector_index.api_key = Some("pc-test".to_string());
        let credentials = config.require_credentials().unwrap();
        assert_eq!(credentials.openai_api_key, "sk-test");
        assert_eq!(credentials.pinecone_api_key, "pc-test");
    }
}
