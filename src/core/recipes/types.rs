//! Wire and domain model for the remote recipe source.
//!
//! TheMealDB answers every endpoint with `{"meals": [...]}` where the array
//! is null (or absent) for zero results. Lookup rows carry twenty numbered
//! `strIngredientN`/`strMeasureN` column pairs next to the fixed columns.

use std::collections::HashMap;

use serde::Deserialize;

/// Response envelope shared by the filter and lookup endpoints.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct MealsEnvelope<T> {
    #[serde(default)]
    pub meals: Option<Vec<T>>,
}

/// Row shape returned by the filter endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MealSummaryRow {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub title: String,
    #[serde(rename = "strMealThumb")]
    pub image_url: String,
}

/// Row shape returned by the lookup endpoint.
#[derive(Debug, Deserialize)]
pub struct MealDetailRow {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub title: String,
    #[serde(rename = "strMealThumb")]
    pub image_url: String,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strTags", default)]
    pub tags: Option<String>,
    /// The numbered ingredient/measure columns (and whatever else the API
    /// adds); values are string-or-null.
    #[serde(flatten)]
    pub columns: HashMap<String, serde_json::Value>,
}

impl MealDetailRow {
    /// Assemble "ingredient - measure" lines from positions 1..20.
    ///
    /// Positions with an empty ingredient name are skipped; an empty measure
    /// degrades to the bare ingredient name.
    pub fn ingredient_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for i in 1..=20 {
            let ingredient = self.column_text(&format!("strIngredient{}", i));
            if ingredient.is_empty() {
                continue;
            }
            let measure = self.column_text(&format!("strMeasure{}", i));
            if measure.is_empty() {
                lines.push(ingredient);
            } else {
                lines.push(format!("{} - {}", ingredient, measure));
            }
        }
        lines
    }

    fn column_text(&self, key: &str) -> String {
        self.columns
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or("")
            .to_string()
    }
}

/// Minimal source-language fields for list rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub image_url: String,
}

impl From<MealSummaryRow> for RecipeSummary {
    fn from(row: MealSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            image_url: row.image_url,
        }
    }
}

/// Full source-language recipe record as fetched, before localization.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub category: String,
    pub area: String,
    pub tags: String,
    /// Raw instruction text; split into lines only after translation.
    pub instructions: String,
    /// "ingredient - measure" lines in source order.
    pub ingredients: Vec<String>,
}

impl From<MealDetailRow> for Recipe {
    fn from(row: MealDetailRow) -> Self {
        let ingredients = row.ingredient_lines();
        Self {
            id: row.id,
            title: row.title,
            image_url: row.image_url,
            category: row.category.unwrap_or_default(),
            area: row.area.unwrap_or_default(),
            tags: row.tags.unwrap_or_default(),
            instructions: row.instructions.unwrap_or_default(),
            ingredients,
        }
    }
}
