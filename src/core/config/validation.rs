use serde_json::{Map, Value};

use crate::core::errors::ConfigError;

const MAX_TIMEOUT_SECS: u64 = 3_600;

pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(openai) = expect_optional_object(root, "openai")? {
        validate_optional_string_field(openai, "openai.api_key", "api_key")?;
        validate_optional_string_field(openai, "openai.base_url", "base_url")?;
        validate_optional_string_field(openai, "openai.completion_model", "completion_model")?;
        validate_optional_string_field(openai, "openai.embedding_model", "embedding_model")?;
    }

    if let Some(index) = expect_optional_object(root, "vector_index")? {
        validate_optional_string_field(index, "vector_index.api_key", "api_key")?;
        validate_optional_string_field(index, "vector_index.name", "name")?;
        validate_optional_string_field(index, "vector_index.host", "host")?;
        validate_optional_string_field(
            index,
            "vector_index.control_plane_url",
            "control_plane_url",
        )?;
        validate_optional_string_field(index, "vector_index.namespace", "namespace")?;
        validate_optional_string_field(index, "vector_index.api_version", "api_version")?;
    }

    if let Some(retrieval) = expect_optional_object(root, "retrieval")? {
        validate_u64_field(retrieval, "retrieval.top_k", "top_k", 1, 100)?;
    }

    if let Some(timeouts) = expect_optional_object(root, "timeouts")? {
        for key in ["embedding_secs", "query_secs", "completion_secs", "connect_secs"] {
            validate_u64_field(
                timeouts,
                &format!("timeouts.{}", key),
                key,
                1,
                MAX_TIMEOUT_SECS,
            )?;
        }
    }

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 0, 65_535)?;
        validate_string_array_field(server, "server.allowed_origins", "allowed_origins")?;
    }

    if let Some(app) = expect_optional_object(root, "app")? {
        validate_u64_field(
            app,
            "app.max_input_length",
            "max_input_length",
            1,
            100_000,
        )?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(config_type_error(key, "object")),
    }
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ConfigError::OutOfRange {
            path: path.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    match section.get(key) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(config_type_error(path, "string")),
    }
}

fn validate_string_array_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(items) = value.as_array() else {
        return Err(config_type_error(path, "array of strings"));
    };
    if items.iter().all(Value::is_string) {
        Ok(())
    } else {
        Err(config_type_error(path, "array of strings"))
    }
}

fn config_type_error(path: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidType {
        path: path.to_string(),
        expected,
    }
}
