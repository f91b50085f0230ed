use std::env;
use std::fs;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::core::config::AppPaths;
use crate::core::errors::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Uses `PROBA_SESSION_TOKEN` when set, otherwise generates a token and
/// writes it next to the user data so a local front-end can pick it up.
pub fn init_session_token(paths: &AppPaths) -> SessionToken {
    if let Ok(token) = env::var("PROBA_SESSION_TOKEN") {
        if !token.trim().is_empty() {
            return SessionToken::new(token);
        }
    }

    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let token_path = paths.session_token_path();
    if let Some(parent) = token_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(err) = fs::write(&token_path, &token) {
        tracing::warn!("Failed to write session token: {}", err);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(&token_path) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            let _ = fs::set_permissions(&token_path, perms);
        }
    }

    SessionToken::new(token)
}

pub fn require_api_key(headers: &HeaderMap, expected: &SessionToken) -> Result<(), ApiError> {
    let header_value = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if header_value.is_empty() || header_value != expected.value() {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}
