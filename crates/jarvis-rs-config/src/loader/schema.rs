//! Schema validation helpers for JSON5 assistant configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed = [
        "$schema",
        "name",
        "memory_file",
        "exit_keywords",
        "command_prefix",
        "remember_prefix",
        "list_memory_command",
        "system_prompt",
        "bare_commands",
        "generator",
        "commands",
        "voice",
    ];
    ensure_allowed_keys(map, &allowed, layer, "")?;

    for key in [
        "$schema",
        "name",
        "memory_file",
        "command_prefix",
        "remember_prefix",
        "list_memory_command",
        "system_prompt",
    ] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, key)?;
        }
    }
    if let Some(value) = map.get("exit_keywords") {
        validate_string_array(value, layer, "exit_keywords")?;
    }
    if let Some(value) = map.get("bare_commands") {
        expect_bool(value, layer, "bare_commands")?;
    }
    if let Some(value) = map.get("generator") {
        validate_generator(value, layer, "generator")?;
    }
    if let Some(value) = map.get("commands") {
        validate_commands(value, layer, "commands")?;
    }
    if let Some(value) = map.get("voice") {
        validate_voice(value, layer, "voice")?;
    }

    Ok(())
}

/// Validate the "generator" block.
fn validate_generator(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "backend",
            "model",
            "base_url",
            "api_key_env",
            "timeout_secs",
            "max_turns",
            "fallback",
        ],
        layer,
        path,
    )?;
    validate_backend_fields(map, layer, path)?;
    if let Some(value) = map.get("max_turns") {
        expect_u64(value, layer, &join_path(path, "max_turns"))?;
    }
    if let Some(value) = map.get("fallback") {
        let fallback_path = join_path(path, "fallback");
        let fallback = expect_object(value, layer, &fallback_path)?;
        ensure_allowed_keys(
            fallback,
            &["backend", "model", "base_url", "api_key_env", "timeout_secs"],
            layer,
            &fallback_path,
        )?;
        validate_backend_fields(fallback, layer, &fallback_path)?;
    }
    Ok(())
}

/// Validate connection fields shared by the primary and fallback backends.
fn validate_backend_fields(
    map: &Map<String, Value>,
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    if let Some(value) = map.get("backend") {
        let backend_path = join_path(path, "backend");
        match value.as_str() {
            Some("ollama" | "openai") => {}
            Some(_) => {
                return Err(invalid_field(
                    layer,
                    &backend_path,
                    "expected one of: ollama, openai",
                ));
            }
            None => return Err(invalid_field(layer, &backend_path, "expected string")),
        }
    }
    for key in ["model", "base_url", "api_key_env"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("timeout_secs") {
        expect_u64(value, layer, &join_path(path, "timeout_secs"))?;
    }
    Ok(())
}

/// Validate the "commands" block.
fn validate_commands(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["browser_url", "browser", "editor"], layer, path)?;
    if let Some(value) = map.get("browser_url") {
        expect_string(value, layer, &join_path(path, "browser_url"))?;
    }
    for key in ["browser", "editor"] {
        if let Some(value) = map.get(key) {
            let key_path = join_path(path, key);
            validate_string_array(value, layer, &key_path)?;
            if expect_array(value, layer, &key_path)?.is_empty() {
                return Err(invalid_field(layer, &key_path, "expected non-empty array"));
            }
        }
    }
    Ok(())
}

/// Validate the "voice" block.
fn validate_voice(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["output", "rate", "speech_program"], layer, path)?;
    if let Some(value) = map.get("output") {
        let output_path = join_path(path, "output");
        match value.as_str() {
            Some("console" | "speech") => {}
            Some(_) => {
                return Err(invalid_field(
                    layer,
                    &output_path,
                    "expected one of: console, speech",
                ));
            }
            None => return Err(invalid_field(layer, &output_path, "expected string")),
        }
    }
    if let Some(value) = map.get("rate") {
        expect_u64(value, layer, &join_path(path, "rate"))?;
    }
    if let Some(value) = map.get("speech_program") {
        expect_string(value, layer, &join_path(path, "speech_program"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON array or return a typed error.
fn expect_array<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ConfigError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(invalid_field(layer, path, "expected array")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a non-negative JSON integer or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = expect_array(value, layer, path)?;
    for (idx, entry) in arr.iter().enumerate() {
        if entry.as_str().is_none() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
