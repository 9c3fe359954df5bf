//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use cucina_backend::{
    app::{create_app, AppState},
    config::{CredentialSettings, Environment, FoodDbSettings, LlmSettings, LogFormat, Settings},
};
use serde_json::{json, Value};
use std::error::Error;
use tower::ServiceExt;

pub const PROJECT_ID: &str = "test-project";
pub const MODEL: &str = "meta/test-model";
pub const CHAT_PATH: &str =
    "/v1/projects/test-project/locations/us-east5/endpoints/openapi/chat/completions";
pub const STATIC_TOKEN: &str = "ya29.static-test-token";

/// Placeholder for a service that a test never reaches.
pub const UNUSED_BASE: &str = "http://127.0.0.1:9";

pub type TestResult = Result<(), Box<dyn Error>>;

pub fn static_credentials() -> CredentialSettings {
    CredentialSettings {
        service_account_key: None,
        static_token: Some(STATIC_TOKEN.to_string()),
        refresh_skew_seconds: 60,
    }
}

pub fn no_credentials() -> CredentialSettings {
    CredentialSettings {
        refresh_skew_seconds: 60,
        ..CredentialSettings::default()
    }
}

pub fn settings(llm_base: &str, food_db_base: &str, credentials: CredentialSettings) -> Settings {
    Settings {
        env: Environment::Dev,
        log_format: LogFormat::Pretty,
        server_addr: "127.0.0.1:0".to_string(),
        cors_allow_origins: vec!["http://localhost:3000".to_string()],
        llm: LlmSettings {
            endpoint: llm_base.to_string(),
            region: "us-east5".to_string(),
            project_id: PROJECT_ID.to_string(),
            model: MODEL.to_string(),
        },
        credentials,
        food_db: FoodDbSettings {
            base_url: food_db_base.to_string(),
            page_size: 20,
            user_agent: "CucinaDietApp/test".to_string(),
        },
        upstream_timeout_seconds: Some(5),
    }
}

pub fn app(settings: Settings) -> Router {
    let state = AppState::from_settings(settings).expect("test settings are valid");
    create_app(state)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// Send one request and return status plus JSON body.
pub async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value), Box<dyn Error>> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

/// Chat-completions envelope around `content`.
pub fn chat_reply(content: Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": MODEL,
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content }
        }]
    })
}

/// Message contents of a captured chat-completions request body.
pub fn message_contents(body: &Value) -> Vec<String> {
    body["messages"]
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m["content"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
