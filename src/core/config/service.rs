use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::paths::AppPaths;
use super::settings::AppConfig;
use super::validation::validate_config;
use crate::core::errors::ConfigError;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 6] = [
    "api_key",
    "secret",
    "password",
    "_token",
    "credential",
    "bearer",
];

/// Environment variables that override the file-based configuration.
const ENV_OVERRIDES: [(&str, &[&str], EnvKind); 8] = [
    ("OPENAI_API_KEY", &["openai", "api_key"], EnvKind::Text),
    ("OPENAI_BASE_URL", &["openai", "base_url"], EnvKind::Text),
    ("PINECONE_API_KEY", &["vector_index", "api_key"], EnvKind::Text),
    ("PINECONE_INDEX", &["vector_index", "name"], EnvKind::Text),
    ("PINECONE_INDEX_HOST", &["vector_index", "host"], EnvKind::Text),
    ("PINECONE_NAMESPACE", &["vector_index", "namespace"], EnvKind::Text),
    ("PROBA_TOP_K", &["retrieval", "top_k"], EnvKind::Integer),
    ("PORT", &["server", "port"], EnvKind::Integer),
];

#[derive(Clone, Copy)]
enum EnvKind {
    Text,
    Integer,
}

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("PROBA_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.paths.secrets_path.clone()
    }

    /// Loads `config.yml` and `secrets.yaml`, overlays the process environment,
    /// validates the merged tree and returns its typed view.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        self.load_config_with(|key| env::var(key).ok())
    }

    pub fn load_config_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let public_config = load_yaml_file(&self.config_path())?;
        let secrets_config = load_yaml_file(&self.secrets_path())?;
        let mut merged = deep_merge(&public_config, &secrets_config);
        apply_env_overrides(&mut merged, lookup);

        validate_config(&merged)?;
        serde_json::from_value(merged).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Config rendered for logs, with every secret masked.
    pub fn redacted(&self, config: &AppConfig) -> Value {
        match serde_json::to_value(config) {
            Ok(value) => redact_sensitive_values(&value),
            Err(_) => Value::Null,
        }
    }
}

/// A missing file is an empty mapping; a file that exists but cannot be read
/// or parsed is an error.
fn load_yaml_file(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let unreadable = |message: String| ConfigError::Unreadable {
        path: path.display().to_string(),
        message,
    };

    let contents = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    if contents.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_yaml::from_str::<Value>(&contents).map_err(|e| unreadable(e.to_string()))? {
        value @ Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(unreadable("top level is not a mapping".to_string())),
    }
}

fn apply_env_overrides<F>(config: &mut Value, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (var, path, kind) in ENV_OVERRIDES {
        let Some(raw) = lookup(var) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value = match kind {
            EnvKind::Text => Value::String(raw.to_string()),
            // Unparseable numbers stay strings so validation reports them.
            EnvKind::Integer => raw
                .parse::<u64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
        };
        ensure_object_path(config, path, value);
    }
}

fn ensure_object_path(config: &mut Value, path: &[&str], value: Value) {
    if path.is_empty() {
        return;
    }

    let mut current = config;
    for (index, key) in path.iter().enumerate() {
        if index == path.len() - 1 {
            if let Some(map) = current.as_object_mut() {
                map.insert(key.to_string(), value);
            }
            return;
        }

        if !current.get(*key).map(|v| v.is_object()).unwrap_or(false) {
            let Some(map) = current.as_object_mut() else {
                return;
            };
            map.insert((*key).to_string(), Value::Object(Map::new()));
        }

        let Some(next) = current.get_mut(*key) else {
            return;
        };
        current = next;
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn service_in(dir: &Path) -> ConfigService {
        ConfigService::new(Arc::new(AppPaths::under(dir)))
    }

    #[test]
    fn deep_merge_merges_objects_and_overrides_scalars() {
        let base = json!({
            "a": 1,
            "b": { "c": 2, "d": 3 },
            "arr": [1, 2]
        });
        let override_value = json!({
            "b": { "c": 99 },
            "arr": [3],
            "e": "x"
        });

        let merged = deep_merge(&base, &override_value);

        assert_eq!(
            merged,
            json!({
                "a": 1,
                "b": { "c": 99, "d": 3 },
                "arr": [3],
                "e": "x"
            })
        );
    }

    #[test]
    fn redact_sensitive_values_replaces_secrets_only() {
        let input = json!({
            "openai": { "api_key": "sk-secret", "completion_model": "gpt-4o" },
            "vector_index": { "api_key": null, "name": "mathindex" }
        });

        let redacted = redact_sensitive_values(&input);

        assert_eq!(
            redacted,
            json!({
                "openai": { "api_key": "****", "completion_model": "gpt-4o" },
                "vector_index": { "api_key": null, "name": "mathindex" }
            })
        );
    }

    #[test]
    fn files_and_environment_are_layered() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        fs::write(
            dir.path().join(".proba").join("config.yml"),
            "retrieval:\n  top_k: 5\nvector_index:\n  name: probaindex\n",
        )
        .unwrap();
        fs::write(
            service.secrets_path(),
            "openai:\n  api_key: sk-from-file\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("PINECONE_API_KEY", "pc-from-env"),
            ("PROBA_TOP_K", "4"),
        ]);
        let config = service
            .load_config_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-file"));
        assert_eq!(config.vector_index.api_key.as_deref(), Some("pc-from-env"));
        assert_eq!(config.vector_index.name, "probaindex");
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn invalid_env_number_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());

        let err = service
            .load_config_with(|key| (key == "PROBA_TOP_K").then(|| "three".to_string()))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidType { .. }));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        fs::write(dir.path().join(".proba").join("config.yml"), "retrieval: [unclosed").unwrap();

        let err = service.load_config_with(|_| None).unwrap_err();

        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn non_mapping_secrets_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        fs::write(service.secrets_path(), "- just\n- a list\n").unwrap();

        let err = service.load_config_with(|_| None).unwrap_err();

        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn empty_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        fs::write(dir.path().join(".proba").join("config.yml"), "").unwrap();

        let config = service.load_config_with(|_| None).unwrap();

        assert_eq!(config.retrieval.top_k, 3);
    }
}
