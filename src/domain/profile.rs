//! User profile domain types
//!
//! The profile is owned by the client and sent along with each request that
//! needs personalization. The server only checks presence and enum values.

use serde::{Deserialize, Serialize};

/// Calorie target before goal and activity adjustments.
pub const BASE_DAILY_CALORIES: i32 = 2000;

/// Eating styles offered by the settings screen.
pub const DIET_STYLES: &[&str] = &[
    "No preference",
    "Vegetarian",
    "Vegan",
    "Pescatarian",
    "Low-carb / keto-ish",
    "Mediterranean-style",
    "Gluten-free",
    "Paleo",
    "High-protein",
    "Intermittent fasting-friendly",
    "Dairy-free",
    "Nut-free",
    "Whole foods / unprocessed",
];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[default]
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    fn calorie_adjustment(self) -> i32 {
        match self {
            Self::Lose => -300,
            Self::Maintain => 0,
            Self::Gain => 300,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl ActivityLevel {
    fn calorie_adjustment(self) -> i32 {
        match self {
            Self::Low => -150,
            Self::Moderate => 0,
            Self::High => 150,
        }
    }
}

/// How long the user is willing to cook. `Quick` means 20 minutes at most.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CookingTime {
    Quick,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealPrep {
    Never,
    #[default]
    Sometimes,
    Often,
}

/// Survey answers and derived calorie target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub goal: Goal,
    #[serde(default = "default_diet")]
    pub diet: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub dislikes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default)]
    pub activity: ActivityLevel,
    #[serde(default)]
    pub cooking_time: CookingTime,
    #[serde(default)]
    pub meal_prep: MealPrep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<i32>,
}

fn default_diet() -> String {
    DIET_STYLES[0].to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            goal: Goal::default(),
            diet: default_diet(),
            dislikes: String::new(),
            height: None,
            weight: None,
            activity: ActivityLevel::default(),
            cooking_time: CookingTime::default(),
            meal_prep: MealPrep::default(),
            target_calories: None,
        }
    }
}

/// Linear daily calorie target for a goal and activity level.
pub fn target_calories(goal: Goal, activity: ActivityLevel) -> i32 {
    BASE_DAILY_CALORIES + goal.calorie_adjustment() + activity.calorie_adjustment()
}

impl UserProfile {
    /// Stored target, or the formula value when the client didn't send one.
    pub fn effective_target_calories(&self) -> i32 {
        self.target_calories
            .unwrap_or_else(|| target_calories(self.goal, self.activity))
    }

    /// Fill in `target_calories` from the formula if it is missing.
    pub fn with_derived_target(mut self) -> Self {
        self.target_calories = Some(self.effective_target_calories());
        self
    }
}
