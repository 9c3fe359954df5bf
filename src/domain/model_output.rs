//! Typed decoding of model replies.
//!
//! The model is asked for strict JSON but nothing guarantees it. Every reply
//! goes through [`decode`], which pulls the message content out of the
//! chat-completions envelope, parses it when it arrives as text, and checks
//! it against a schema that rejects unknown and missing required fields.
//! There is no repair step: a reply either matches or is an error.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;

use super::food::FoodItem;
use super::meals::MealSuggestion;

#[derive(Debug, Error)]
pub enum ModelOutputError {
    #[error("reply has no choices[0].message")]
    Empty,

    #[error("content is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("content does not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),
}

/// `choices[0].message.content`, falling back to the message itself when the
/// content key is absent or null.
pub fn extract_content(reply: &Value) -> Result<&Value, ModelOutputError> {
    let message = reply
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .filter(|message| !message.is_null())
        .ok_or(ModelOutputError::Empty)?;

    match message.get("content") {
        Some(content) if !content.is_null() => Ok(content),
        _ => Ok(message),
    }
}

/// Decode a chat-completions reply into `T`.
pub fn decode<T: DeserializeOwned>(reply: &Value) -> Result<T, ModelOutputError> {
    let content = extract_content(reply)?;

    let structured = match content {
        Value::String(text) => serde_json::from_str(text).map_err(ModelOutputError::NotJson)?,
        other => other.clone(),
    };

    serde_json::from_value(structured).map_err(ModelOutputError::Schema)
}

/// Reply shape for the food-estimate prompt.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateReply {
    pub items: Vec<EstimatedFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EstimatedFood {
    pub name: String,
    #[serde(default)]
    pub approx_calories_per_100g: Option<f64>,
    #[serde(default)]
    pub approx_protein_per_100g: Option<f64>,
    #[serde(default)]
    pub approx_carbs_per_100g: Option<f64>,
    #[serde(default)]
    pub approx_fat_per_100g: Option<f64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub notes: String,
}

impl From<EstimatedFood> for FoodItem {
    fn from(e: EstimatedFood) -> Self {
        Self {
            name: e.name,
            calories_per_100g: e.approx_calories_per_100g,
            protein_per_100g: e.approx_protein_per_100g,
            carbs_per_100g: e.approx_carbs_per_100g,
            fat_per_100g: e.approx_fat_per_100g,
            notes: e.notes,
        }
    }
}

/// Reply shape for the meal-plan prompt.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MealPlanReply {
    pub meals: Vec<MealSuggestion>,
}
