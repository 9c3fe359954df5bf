//! Domain types and DTOs
//!
//! Value types exchanged with the browser client, the model and the food
//! database. Nothing here touches the network.

pub mod chat;
pub mod food;
pub mod meals;
pub mod model_output;
pub mod profile;
pub mod prompts;

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing key. Pair with `#[serde(default)]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Re-export commonly used types
pub use food::{DailyLog, DailyTotals, FoodItem, FoodProduct, MacroTotal};
pub use meals::{MealLabel, MealSuggestion};
pub use profile::UserProfile;

// Prompt and decoder helpers are accessed via their modules
