//! Service layer modules for external integrations.
//!
//! Contains clients for the hosted LLM endpoint and the public food database.

pub mod food_db;
pub mod llm_client;

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::Settings;

pub use food_db::FoodDbClient;
pub use llm_client::LlmClient;

/// Shared HTTP client for all outbound calls. No timeout unless configured.
pub fn build_http_client(settings: &Settings) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = settings.upstream_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to create HTTP client")
}
