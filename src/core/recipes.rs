pub mod service;
pub mod types;

pub use service::{MealDbClient, RecipeSource};
pub use types::{Recipe, RecipeSummary};
