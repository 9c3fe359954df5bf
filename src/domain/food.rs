//! Food items and daily macro totals.

use serde::{Deserialize, Serialize};

/// A food with optional per-100g macro estimates.
///
/// `None` means "unknown", which is not the same as zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub name: String,
    #[serde(default, alias = "approxCaloriesPer100g")]
    pub calories_per_100g: Option<f64>,
    #[serde(default, alias = "approxProteinPer100g")]
    pub protein_per_100g: Option<f64>,
    #[serde(default, alias = "approxCarbsPer100g")]
    pub carbs_per_100g: Option<f64>,
    #[serde(default, alias = "approxFatPer100g")]
    pub fat_per_100g: Option<f64>,
    #[serde(
        default,
        deserialize_with = "super::null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub notes: String,
}

/// A food-database record: a [`FoodItem`] plus product metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodProduct {
    pub code: String,
    #[serde(flatten)]
    pub item: FoodItem,
    pub brand: String,
    pub image: Option<String>,
    pub categories: String,
}

/// Sum of one macro over a log, plus how many items had no value for it.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacroTotal {
    pub total: f64,
    pub unknown_count: usize,
}

impl MacroTotal {
    fn add(mut self, value: Option<f64>) -> Self {
        match value {
            Some(v) => self.total += v,
            None => self.unknown_count += 1,
        }
        self
    }

    pub fn has_unknowns(&self) -> bool {
        self.unknown_count > 0
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub calories: MacroTotal,
    pub protein: MacroTotal,
    pub carbs: MacroTotal,
    pub fat: MacroTotal,
}

/// The foods logged so far today, in logging order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DailyLog {
    items: Vec<FoodItem>,
}

impl DailyLog {
    pub fn new(items: Vec<FoodItem>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: FoodItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fold over the log; absent values add nothing but are counted.
    pub fn totals(&self) -> DailyTotals {
        self.items
            .iter()
            .fold(DailyTotals::default(), |acc, item| DailyTotals {
                calories: acc.calories.add(item.calories_per_100g),
                protein: acc.protein.add(item.protein_per_100g),
                carbs: acc.carbs.add(item.carbs_per_100g),
                fat: acc.fat.add(item.fat_per_100g),
            })
    }
}
