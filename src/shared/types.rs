use serde::{Deserialize, Serialize};

/// Minimal recipe fields for list rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedSummary {
    pub id: String,
    pub title: String,
    pub image_url: String,
}

/// A browsable category tile for the home screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedCategory {
    /// Canonical category code understood by the recipe source ("Chicken").
    pub code: String,
    /// User-language display label.
    pub label: String,
    pub image_url: String,
}

/// Category screen payload: translated heading plus the recipe list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListing {
    pub label: String,
    pub recipes: Vec<LocalizedSummary>,
}

/// Full recipe record, ready to render.
///
/// Every text field carries user-language text, except fields whose
/// translation failed - those fall back to the source-language original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedRecipeDetail {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub category: String,
    pub area: String,
    pub tags: String,
    /// "ingredient - measure" lines, source order, positions 1..20.
    pub ingredients: Vec<String>,
    /// Non-empty trimmed instruction lines.
    pub instruction_lines: Vec<String>,
    pub is_favorite: bool,
}

/// A persisted favorite. Title is the user-language snapshot taken when
/// the recipe was favorited; it is not re-translated later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub meal_id: String,
    pub title: String,
    pub image_url: String,
}
