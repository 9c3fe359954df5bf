//! Prompt construction for the two LLM-backed routes.

use serde::Serialize;

use super::chat::ChatMessage;
use super::food::DailyLog;
use super::meals::MealLabel;
use super::profile::UserProfile;

const FOOD_ESTIMATE_INSTRUCTIONS: &str = r#"You are a nutrition assistant. The user describes foods they ate or plan to eat.
You may also receive a short profile with their goal, eating style and daily calorie target.
Treat the profile as background only; do not repeat it back.

Answer with STRICT JSON only, no surrounding text, in exactly this shape:

{
  "items": [
    {
      "name": "string",
      "approxCaloriesPer100g": number | null,
      "approxProteinPer100g": number | null,
      "approxCarbsPer100g": number | null,
      "approxFatPer100g": number | null,
      "notes": "short clarification or assumption"
    }
  ]
}

Rules:
- The reply must be valid JSON that parses as-is. Do not add other keys.
- When unsure about a nutrient, use null rather than guessing.
- A mixed meal (for example "2 eggs and toast with butter") may become several items."#;

const MEAL_PLAN_INSTRUCTIONS: &str = r#"You are a calm, practical nutrition coach.
Suggest simple meals for today that fit the user's profile.

Answer with STRICT JSON only, no surrounding text, in exactly this shape:

{
  "meals": [
    {
      "label": "Breakfast" | "Lunch" | "Dinner" | "Snack",
      "name": "short meal name",
      "description": "one or two friendly sentences about the meal",
      "approxCalories": number | null,
      "notes": "short note on why it fits the profile"
    }
  ]
}

Rules:
- ALWAYS return exactly 4 meals: one Breakfast, one Lunch, one Dinner and one Snack.
- Let the goal, diet style, target calories, cooking time and meal prep preference guide every choice.
- Never use foods listed in dislikes.
- If cookingTime is "quick", every meal must take 20 minutes or less.
- If mealPrep is "often", at least one meal must be suitable for batch cooking.
- If foods already eaten today are listed, balance the remaining meals so the whole day lands near the target calories without repeating the same macros.
- Prefer simple, realistic meals over elaborate recipes.
- The approxCalories of the 4 meals together should roughly match the remaining calorie budget."#;

fn profile_message<T: Serialize>(profile: &T) -> Option<ChatMessage> {
    match serde_json::to_string(profile) {
        Ok(json) => Some(ChatMessage::system(format!("User profile JSON:\n{}", json))),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize profile for prompt");
            None
        }
    }
}

/// Messages for the food-estimate call: instructions, optional profile, query.
pub fn food_estimate_messages(query: &str, profile: Option<&UserProfile>) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(FOOD_ESTIMATE_INSTRUCTIONS)];
    messages.extend(profile.and_then(profile_message));
    messages.push(ChatMessage::user(query));
    messages
}

/// Messages for the meal-plan call.
///
/// The profile is sent with its target filled in, and when the day already
/// has logged foods the remaining calorie budget is stated explicitly.
pub fn meal_plan_messages(profile: &UserProfile, today: &DailyLog) -> Vec<ChatMessage> {
    let profile = profile.clone().with_derived_target();
    let target = profile.effective_target_calories();

    let mut messages = vec![ChatMessage::system(MEAL_PLAN_INSTRUCTIONS)];
    messages.extend(profile_message(&profile));

    if !today.is_empty() {
        let totals = today.totals();
        let logged = serde_json::to_string(today.items()).unwrap_or_default();
        let remaining = (f64::from(target) - totals.calories.total).max(0.0);

        let mut summary = format!(
            "Foods already eaten today (approx):\n{}\nLogged so far: ~{:.0} kcal, {:.0} g protein, {:.0} g carbs, {:.0} g fat.",
            logged,
            totals.calories.total,
            totals.protein.total,
            totals.carbs.total,
            totals.fat.total,
        );
        if totals.calories.has_unknowns() {
            summary.push_str(&format!(
                " {} logged item(s) have no calorie estimate; allow for them.",
                totals.calories.unknown_count
            ));
        }
        summary.push_str(&format!(
            "\nRemaining budget toward the {} kcal target: ~{:.0} kcal.",
            target, remaining
        ));
        messages.push(ChatMessage::system(summary));
    }

    let labels: Vec<&str> = MealLabel::ALL.iter().map(|l| l.as_str()).collect();
    messages.push(ChatMessage::user(format!(
        "Propose exactly 4 meals for today: one {}, one {}, one {} and one {}. Make sure they fit my cooking time and meal prep preferences.",
        labels[0], labels[1], labels[2], labels[3]
    )));

    messages
}
