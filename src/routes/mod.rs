pub mod food_estimate;
pub mod food_search;
pub mod health;
pub mod meal_plan;

use axum::{
    extract::{FromRequest, FromRequestParts},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::error::ApiError;

/// `Json` extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` extractor whose rejections use the API error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Proxies
        .route("/api/food-estimate", post(food_estimate::estimate_food))
        .route("/api/meal-plan", post(meal_plan::suggest_meals))
        .route("/api/food-search", get(food_search::search_foods))
}
