use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use super::store::{IndexMatch, VectorIndex};
use crate::core::config::settings::VectorIndexSettings;
use crate::core::errors::{with_deadline, ProviderError};
use crate::core::http::{build_client, status_error};

const PROVIDER: &str = "pinecone";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

/// Read-only client for one Pinecone index's data plane.
#[derive(Clone)]
pub struct PineconeIndex {
    index_name: String,
    host_url: String,
    api_key: String,
    api_version: String,
    namespace: Option<String>,
    client: Client,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: Option<String>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

impl PineconeIndex {
    /// Builds the client, resolving the data-plane host through the control
    /// plane when it is not configured. Called once at startup.
    pub async fn connect(
        settings: &VectorIndexSettings,
        api_key: String,
        connect_timeout: Duration,
        resolve_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = build_client(PROVIDER, connect_timeout)?;

        let host = match settings.host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                with_deadline(
                    "index host resolution",
                    resolve_timeout,
                    describe_index_host(&client, settings, &api_key),
                )
                .await?
            }
        };

        Ok(Self {
            index_name: settings.name.clone(),
            host_url: normalize_host(&host),
            api_key,
            api_version: settings.api_version.clone(),
            namespace: settings
                .namespace
                .clone()
                .filter(|ns| !ns.trim().is_empty()),
            client,
        })
    }

    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.api_key)
            .header(API_VERSION_HEADER, &self.api_version)
    }
}

async fn describe_index_host(
    client: &Client,
    settings: &VectorIndexSettings,
    api_key: &str,
) -> Result<String, ProviderError> {
    let url = format!(
        "{}/indexes/{}",
        settings.control_plane_url.trim_end_matches('/'),
        settings.name
    );

    let res = client
        .get(&url)
        .header("Api-Key", api_key)
        .header(API_VERSION_HEADER, &settings.api_version)
        .send()
        .await
        .map_err(|e| ProviderError::transport(PROVIDER, e))?;

    if !res.status().is_success() {
        return Err(status_error(PROVIDER, res).await);
    }

    let payload: DescribeIndexResponse = res
        .json()
        .await
        .map_err(|e| ProviderError::decode(PROVIDER, e))?;

    payload
        .host
        .filter(|host| !host.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse {
            provider: PROVIDER,
            what: "index host",
        })
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        &self.index_name
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<IndexMatch>, ProviderError> {
        let url = format!("{}/query", self.host_url);

        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": include_metadata,
            "includeValues": false,
        });
        if let (Some(obj), Some(ns)) = (body.as_object_mut(), &self.namespace) {
            obj.insert("namespace".to_string(), Value::String(ns.clone()));
        }

        let res = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !res.status().is_success() {
            return Err(status_error(PROVIDER, res).await);
        }

        let payload: QueryResponse = res
            .json()
            .await
            .map_err(|e| ProviderError::decode(PROVIDER, e))?;

        Ok(payload.matches)
    }
}
