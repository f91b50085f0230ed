use std::time::Duration;

use reqwest::Client;

use crate::core::errors::ProviderError;

/// Shared builder for the provider HTTP clients.
///
/// Only the connect phase is bounded here; whole-request deadlines are applied
/// per operation by the components that own the call.
pub fn build_client(
    provider: &'static str,
    connect_timeout: Duration,
) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(concat!("proba-assistant/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::transport(provider, e))
}

/// Reads an unsuccessful response into a [`ProviderError::Status`].
pub async fn status_error(provider: &'static str, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Status {
        provider,
        status,
        body: truncate(&body, 512),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
