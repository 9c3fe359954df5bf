//! Daily meal suggestions backed by the LLM.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiJson;
use crate::app::AppState;
use crate::domain::meals::plan_deviations;
use crate::domain::{DailyLog, FoodItem, MealSuggestion, UserProfile};
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_id::RequestIdExt;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanRequest {
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub today_items: Vec<FoodItem>,
}

#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    pub meals: Vec<MealSuggestion>,
}

/// Suggest Breakfast, Lunch, Dinner and Snack for the rest of the day.
///
/// The model's plan is returned as-is even when it doesn't contain exactly
/// one meal per label; deviations are only logged. Credentials are checked
/// before the body.
///
/// POST /api/meal-plan
pub async fn suggest_meals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<ApiJson<MealPlanRequest>, ApiError>,
) -> ApiResult<Json<MealPlanResponse>> {
    let token = state.llm_client.access_token().await?;
    let ApiJson(req) = body?;

    let profile = req.profile.ok_or_else(|| {
        ApiError::BadRequest("Profile is required to generate a meal plan.".to_string())
    })?;
    let today = DailyLog::new(req.today_items);

    let meals = state
        .llm_client
        .suggest_meals(&token, &profile, &today, headers.request_id())
        .await?;

    let deviations = plan_deviations(&meals);
    if !deviations.is_empty() {
        tracing::warn!(
            meals = meals.len(),
            missing = ?deviations.missing,
            duplicated = ?deviations.duplicated,
            unrecognized = ?deviations.unrecognized,
            "Meal plan does not have exactly one meal per label"
        );
    }

    Ok(Json(MealPlanResponse { meals }))
}
