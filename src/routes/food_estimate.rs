//! Free-text food lookup backed by the LLM.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiJson;
use crate::app::AppState;
use crate::domain::{FoodItem, UserProfile};
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_id::RequestIdExt;

#[derive(Debug, Deserialize)]
pub struct FoodEstimateRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct FoodEstimateResponse {
    pub items: Vec<FoodItem>,
}

/// Estimate macros for a described food or meal.
///
/// Credentials are checked before the body, so a server without them
/// answers 500 whatever the client sent.
///
/// POST /api/food-estimate
pub async fn estimate_food(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<ApiJson<FoodEstimateRequest>, ApiError>,
) -> ApiResult<Json<FoodEstimateResponse>> {
    let token = state.llm_client.access_token().await?;
    let ApiJson(req) = body?;

    let query = req.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Missing query".to_string()));
    }

    let items = state
        .llm_client
        .estimate_foods(&token, query, req.profile.as_ref(), headers.request_id())
        .await?;

    tracing::debug!(items = items.len(), "Food estimate complete");

    Ok(Json(FoodEstimateResponse { items }))
}
