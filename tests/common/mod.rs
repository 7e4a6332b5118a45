use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

use relaychat::config::{ApiConfig, Config, StorageBackend};

/// Config pointing the provider at a mock server and the key store at a temp file
#[allow(dead_code)]
pub fn config_for(server_uri: &str, store_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api = ApiConfig {
        base_url: server_uri.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    config.storage.backend = StorageBackend::File;
    config.storage.path = Some(store_path(store_dir));
    config
}

#[allow(dead_code)]
pub fn store_path(store_dir: &TempDir) -> PathBuf {
    store_dir.path().join("store.json")
}

/// Minimal `GET /models` body
#[allow(dead_code)]
pub fn models_body() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [
            { "id": "gpt-3.5-turbo", "object": "model", "owned_by": "openai" }
        ]
    })
}

/// `POST /chat/completions` body with a single choice
#[allow(dead_code)]
pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12 }
    })
}

/// OpenAI-style error envelope
#[allow(dead_code)]
pub fn error_body(message: &str) -> serde_json::Value {
    json!({
        "error": { "message": message, "type": "invalid_request_error", "code": null }
    })
}
