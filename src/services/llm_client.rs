//! Client for the hosted LLM chat-completions endpoint.
//!
//! Provides type-safe methods for:
//! - Food macro estimation from free text
//! - Daily meal suggestions
//!
//! Each method makes exactly one non-streaming request. Nothing is retried.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::auth::CredentialProvider;
use crate::config::LlmSettings;
use crate::domain::chat::{ChatMessage, ChatRequest};
use crate::domain::model_output::{self, EstimateReply, MealPlanReply, ModelOutputError};
use crate::domain::prompts;
use crate::domain::{DailyLog, FoodItem, MealSuggestion, UserProfile};
use crate::error::ApiError;
use crate::middleware::request_id::ForwardRequestId;

/// Client for the LLM service.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    url: String,
    model: String,
    credentials: CredentialProvider,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings, credentials: CredentialProvider, client: Client) -> Self {
        let url = settings.chat_completions_url();
        tracing::info!(url = %url, model = %settings.model, "LLM client initialized");

        Self {
            client,
            url,
            model: settings.model.clone(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialProvider {
        &self.credentials
    }

    /// Bearer token for the next call. Routes resolve it before touching
    /// the request body so a misconfigured server always answers 500.
    pub async fn access_token(&self) -> Result<String, ApiError> {
        self.credentials.access_token().await
    }

    /// Send one chat completion and return the raw reply envelope.
    async fn complete(
        &self,
        token: &str,
        messages: &[ChatMessage],
        request_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        let req = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .forward_request_id(request_id)
            .json(&ChatRequest {
                model: &self.model,
                stream: false,
                messages,
            });

        debug!(url = %self.url, messages = messages.len(), "LLM request");

        let response = req.send().await.map_err(|e| {
            error!(error = %e, "LLM request failed");
            ApiError::Upstream("LLM request failed".to_string())
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.credentials.invalidate();
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "LLM API error");
            return Err(ApiError::Upstream("LLM request failed".to_string()));
        }

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read LLM response body");
            ApiError::Upstream("LLM request failed".to_string())
        })?;

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "LLM response is not JSON");
            ApiError::InvalidModelOutput(ModelOutputError::NotJson(e))
        })
    }

    /// Estimate per-100g macros for the foods described in `query`.
    #[instrument(skip(self, token, profile))]
    pub async fn estimate_foods(
        &self,
        token: &str,
        query: &str,
        profile: Option<&UserProfile>,
        request_id: Option<&str>,
    ) -> Result<Vec<FoodItem>, ApiError> {
        let messages = prompts::food_estimate_messages(query, profile);
        let reply = self.complete(token, &messages, request_id).await?;

        let decoded: EstimateReply = model_output::decode(&reply).map_err(|e| {
            error!(error = %e, reply = %reply, "Failed to decode food estimate");
            e
        })?;

        Ok(decoded.items.into_iter().map(FoodItem::from).collect())
    }

    /// Ask for the day's meals given the profile and what is already logged.
    #[instrument(skip(self, token, profile, today), fields(logged = today.items().len()))]
    pub async fn suggest_meals(
        &self,
        token: &str,
        profile: &UserProfile,
        today: &DailyLog,
        request_id: Option<&str>,
    ) -> Result<Vec<MealSuggestion>, ApiError> {
        let messages = prompts::meal_plan_messages(profile, today);
        let reply = self.complete(token, &messages, request_id).await?;

        let decoded: MealPlanReply = model_output::decode(&reply).map_err(|e| {
            error!(error = %e, reply = %reply, "Failed to decode meal plan");
            e
        })?;

        Ok(decoded.meals)
    }
}
