//! Meal suggestions produced by the meal-plan route.

use serde::{Deserialize, Serialize};

/// The four slots a daily plan is expected to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealLabel {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealLabel {
    pub const ALL: [MealLabel; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

/// One suggested meal. `label` stays free text so that whatever the model
/// returns is handed to the client unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MealSuggestion {
    pub label: String,
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default)]
    pub approx_calories: Option<f64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub notes: String,
}

/// Ways a plan differs from exactly one meal per label.
#[derive(Debug, Default, PartialEq)]
pub struct PlanDeviations {
    pub missing: Vec<MealLabel>,
    pub duplicated: Vec<MealLabel>,
    pub unrecognized: Vec<String>,
}

impl PlanDeviations {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.duplicated.is_empty() && self.unrecognized.is_empty()
    }
}

/// Compare a plan against the one-meal-per-label shape.
pub fn plan_deviations(meals: &[MealSuggestion]) -> PlanDeviations {
    let mut counts = [0usize; 4];
    let mut deviations = PlanDeviations::default();

    for meal in meals {
        match MealLabel::parse(&meal.label) {
            Some(label) => counts[label as usize] += 1,
            None => deviations.unrecognized.push(meal.label.clone()),
        }
    }

    for (label, count) in MealLabel::ALL.into_iter().zip(counts) {
        match count {
            0 => deviations.missing.push(label),
            1 => {}
            _ => deviations.duplicated.push(label),
        }
    }

    deviations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(label: &str) -> MealSuggestion {
        MealSuggestion {
            label: label.to_string(),
            name: format!("{} bowl", label),
            description: String::new(),
            approx_calories: None,
            notes: String::new(),
        }
    }

    #[test]
    fn complete_plan_has_no_deviations() {
        let meals: Vec<_> = ["Breakfast", "Lunch", "Dinner", "Snack"]
            .into_iter()
            .map(meal)
            .collect();
        assert!(plan_deviations(&meals).is_empty());
    }

    #[test]
    fn reports_missing_duplicate_and_unknown_labels() {
        let meals = vec![meal("breakfast"), meal("Lunch"), meal("Lunch"), meal("Dessert")];
        let deviations = plan_deviations(&meals);

        assert_eq!(deviations.missing, vec![MealLabel::Dinner, MealLabel::Snack]);
        assert_eq!(deviations.duplicated, vec![MealLabel::Lunch]);
        assert_eq!(deviations.unrecognized, vec!["Dessert".to_string()]);
    }
}
