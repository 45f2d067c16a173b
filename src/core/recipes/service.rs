//! Adapter over the remote recipe API.
//!
//! Every operation is a single GET. The remote returning zero matches and
//! the remote being unreachable are collapsed into the same observable
//! outcome (empty list / no recipe); the presentation layer shows "no
//! recipes found" either way, so only the log line distinguishes them.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{MealDetailRow, MealSummaryRow, MealsEnvelope, Recipe, RecipeSummary};
use crate::shared::error::{AppError, AppResult};

const DEFAULT_RECIPE_BASE: &str = "https://www.themealdb.com/api/json/v1/1";

/// Uniform contract over the remote recipe source.
///
/// `list_by_ingredient` expects the term already in the source language of
/// the remote API; translating the user's query is the orchestrator's job.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn list_by_category(&self, category: &str) -> Vec<RecipeSummary>;
    async fn list_by_ingredient(&self, ingredient: &str) -> Vec<RecipeSummary>;
    async fn fetch_detail(&self, id: &str) -> Option<Recipe>;
}

/// TheMealDB HTTP client.
pub struct MealDbClient {
    http: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new() -> AppResult<Self> {
        Self::with_base_url(DEFAULT_RECIPE_BASE)
    }

    pub fn with_base_url(base_url: &str) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("culinary-mastermind/meals")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_meals<T: DeserializeOwned>(&self, url: &str) -> AppResult<Vec<T>> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !res.status().is_success() {
            return Err(AppError::Network(format!(
                "Recipe API returned error: {}",
                res.status()
            )));
        }

        let envelope: MealsEnvelope<T> = res
            .json()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse recipe response: {}", e)))?;

        Ok(envelope.meals.unwrap_or_default())
    }

    async fn list(&self, url: &str, what: &str) -> Vec<RecipeSummary> {
        match self.get_meals::<MealSummaryRow>(url).await {
            Ok(rows) => rows.into_iter().map(RecipeSummary::from).collect(),
            Err(e) => {
                eprintln!("[Meals] {} listing failed, treating as empty: {}", what, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn list_by_category(&self, category: &str) -> Vec<RecipeSummary> {
        let url = format!(
            "{}/filter.php?c={}",
            self.base_url,
            urlencoding::encode(category)
        );
        self.list(&url, "Category").await
    }

    async fn list_by_ingredient(&self, ingredient: &str) -> Vec<RecipeSummary> {
        let url = format!(
            "{}/filter.php?i={}",
            self.base_url,
            urlencoding::encode(ingredient)
        );
        self.list(&url, "Ingredient").await
    }

    async fn fetch_detail(&self, id: &str) -> Option<Recipe> {
        let url = format!("{}/lookup.php?i={}", self.base_url, urlencoding::encode(id));
        match self.get_meals::<MealDetailRow>(&url).await {
            Ok(rows) => rows.into_iter().next().map(Recipe::from),
            Err(e) => {
                eprintln!("[Meals] Lookup failed, treating as not found: {}", e);
                None
            }
        }
    }
}
