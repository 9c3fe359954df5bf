//! Product search against the public food database.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiQuery;
use crate::app::AppState;
use crate::domain::FoodProduct;
use crate::error::{ApiError, ApiResult};

/// Shortest query forwarded to the database.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
pub struct FoodSearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FoodSearchResponse {
    pub count: usize,
    pub items: Vec<FoodProduct>,
}

/// GET /api/food-search?q=...
pub async fn search_foods(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<FoodSearchParams>,
) -> ApiResult<Json<FoodSearchResponse>> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Query must be at least {} characters",
            MIN_QUERY_CHARS
        )));
    }

    let items = state.food_db.search(query).await?;

    Ok(Json(FoodSearchResponse {
        count: items.len(),
        items,
    }))
}
