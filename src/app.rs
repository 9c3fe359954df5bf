//! Application state and router assembly.

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::CredentialProvider;
use crate::config::Settings;
use crate::middleware::{assign_request_id, echo_request_id, request_id::request_id_header};
use crate::routes;
use crate::services::{build_http_client, FoodDbClient, LlmClient};

/// Everything a handler needs. Only the token cache inside the credential
/// provider changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub llm_client: LlmClient,
    pub food_db: FoodDbClient,
}

impl AppState {
    pub fn new(settings: Settings, llm_client: LlmClient, food_db: FoodDbClient) -> Arc<Self> {
        Arc::new(Self {
            settings,
            llm_client,
            food_db,
        })
    }

    /// LLM, token and food-database calls all go through one HTTP client.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Arc<Self>> {
        let http = build_http_client(&settings)?;

        let credentials = CredentialProvider::from_settings(&settings.credentials, http.clone());
        tracing::info!(source = credentials.kind(), "LLM credentials resolved");

        let llm_client = LlmClient::new(&settings.llm, credentials, http.clone());
        let food_db = FoodDbClient::new(&settings.food_db, http)?;

        Ok(Self::new(settings, llm_client, food_db))
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings);

    // Request ids are assigned before the trace span opens so the span can
    // record them.
    Router::new()
        .merge(routes::api_router())
        .layer(echo_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(assign_request_id())
        .layer(cors)
        .with_state(state)
}

/// The browser app only issues GET and POST with JSON bodies.
fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    let max_age = if settings.env.is_dev() { 86_400 } else { 3_600 };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, request_id_header()])
        .expose_headers([request_id_header()])
        .max_age(Duration::from_secs(max_age))
}
