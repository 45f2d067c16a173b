//! Culinary Mastermind core.
//!
//! Data orchestration for a bilingual recipe browser: recipes are fetched
//! from a remote HTTP source, every text field is translated through a
//! memoizing cache, and favorites are kept in a persistent insertion-ordered
//! store. The presentation layer drives the [`RecipeOrchestrator`] and the
//! favorites read API re-exported here; rendering stays on its side of the
//! boundary.

pub mod core;
pub mod shared;

pub use crate::core::cancellation::NavigationToken;
pub use crate::core::favorites::FavoritesStore;
pub use crate::core::orchestrator::RecipeOrchestrator;
pub use crate::core::recipes::{MealDbClient, RecipeSource};
pub use crate::core::translator::{GoogleTranslateClient, TranslateProvider, TranslationService};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::settings::AppSettings;
pub use crate::shared::types::{
    CategoryListing, FavoriteEntry, LocalizedCategory, LocalizedRecipeDetail, LocalizedSummary,
};
