//! Composition layer between the presentation layer and the services.
//!
//! Owns no persistent state: every operation is a pipeline over the recipe
//! source, the translation service and the favorites store, returning a
//! render-ready model. All browse/search/open operations are cancellable via
//! a [`NavigationToken`].

use std::sync::Arc;

use futures_util::future::join_all;
use isolang::Language;

use crate::core::cancellation::NavigationToken;
use crate::core::favorites::FavoritesStore;
use crate::core::recipes::{MealDbClient, RecipeSource, RecipeSummary};
use crate::core::translator::{GoogleTranslateClient, TranslationService};
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;
use crate::shared::types::{
    CategoryListing, LocalizedCategory, LocalizedRecipeDetail, LocalizedSummary,
};

/// Built-in home screen categories: canonical source-language codes plus
/// their catalog thumbnails from the recipe source.
const CATEGORY_CATALOG: &[(&str, &str)] = &[
    ("Chicken", "https://www.themealdb.com/images/category/chicken.png"),
    ("Beef", "https://www.themealdb.com/images/category/beef.png"),
    ("Seafood", "https://www.themealdb.com/images/category/seafood.png"),
];

fn parse_lang(code: &str, fallback: Language) -> Language {
    Language::from_639_1(code)
        .or_else(|| Language::from_639_3(code))
        .unwrap_or(fallback)
}

pub struct RecipeOrchestrator {
    source: Arc<dyn RecipeSource>,
    translator: Arc<TranslationService>,
    favorites: Arc<FavoritesStore>,
    /// Language the user reads.
    user_lang: Language,
    /// Language the recipe source publishes in.
    recipe_lang: Language,
}

impl RecipeOrchestrator {
    pub fn new(
        source: Arc<dyn RecipeSource>,
        translator: Arc<TranslationService>,
        favorites: Arc<FavoritesStore>,
        user_lang: Language,
        recipe_lang: Language,
    ) -> Self {
        Self {
            source,
            translator,
            favorites,
            user_lang,
            recipe_lang,
        }
    }

    /// Wire up the default clients and the on-disk favorites store from the
    /// saved settings.
    pub async fn from_settings() -> AppResult<Self> {
        let settings = AppSettings::load().await.unwrap_or_default();

        let source = MealDbClient::with_base_url(&settings.endpoints.recipe_api_base)?;
        let provider = GoogleTranslateClient::with_base_url(&settings.endpoints.translate_api_base)?;
        let favorites = FavoritesStore::open(&AppSettings::favorites_db_path().await?)?;

        let user_lang = parse_lang(&settings.preferences.user_lang, Language::Rus);
        let recipe_lang = parse_lang(&settings.preferences.recipe_lang, Language::Eng);

        println!(
            "[Orchestrator] Ready, translating {} -> {}",
            settings.preferences.recipe_lang, settings.preferences.user_lang
        );

        Ok(Self::new(
            Arc::new(source),
            Arc::new(TranslationService::new(Arc::new(provider))),
            Arc::new(favorites),
            user_lang,
            recipe_lang,
        ))
    }

    /// Direct access for the presentation layer's favorites screens
    /// (`most_recent`, `all`).
    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// The built-in home screen categories with user-language labels.
    pub async fn list_categories(&self, token: &NavigationToken) -> AppResult<Vec<LocalizedCategory>> {
        token.check()?;

        let labels = join_all(
            CATEGORY_CATALOG
                .iter()
                .map(|(code, _)| self.localize(code)),
        )
        .await;

        token.check()?;
        Ok(CATEGORY_CATALOG
            .iter()
            .zip(labels)
            .map(|((code, image_url), label)| LocalizedCategory {
                code: (*code).to_string(),
                label,
                image_url: (*image_url).to_string(),
            })
            .collect())
    }

    /// List a category's recipes in source order.
    ///
    /// `code` is the canonical source-language category code; it is sent to
    /// the recipe source as-is and translated only for the screen label.
    pub async fn browse_category(
        &self,
        code: &str,
        token: &NavigationToken,
    ) -> AppResult<CategoryListing> {
        token.check()?;

        let label = self.localize(code).await;
        let rows = self.source.list_by_category(code).await;
        token.check()?;

        let recipes = self.localize_summaries(rows).await;
        token.check()?;

        Ok(CategoryListing { label, recipes })
    }

    /// Search recipes by ingredient, taking the query in the user's language.
    ///
    /// The query is translated into the source language of the recipe API
    /// first; if that translation fails the search still runs with the
    /// original text rather than blocking on the failure.
    pub async fn search(
        &self,
        query: &str,
        token: &NavigationToken,
    ) -> AppResult<Vec<LocalizedSummary>> {
        token.check()?;

        let term = self
            .translator
            .translate_or_original(query, self.user_lang, self.recipe_lang)
            .await;
        let rows = self.source.list_by_ingredient(&term).await;
        token.check()?;

        let recipes = self.localize_summaries(rows).await;
        token.check()?;

        Ok(recipes)
    }

    /// Fetch and localize one recipe; `None` means not found (a state the
    /// presentation layer renders, not an error).
    ///
    /// Every free-text field is translated independently and concurrently;
    /// a failing field degrades to its source-language text without
    /// aborting the others.
    pub async fn open_recipe(
        &self,
        id: &str,
        token: &NavigationToken,
    ) -> AppResult<Option<LocalizedRecipeDetail>> {
        token.check()?;

        let recipe = match self.source.fetch_detail(id).await {
            Some(recipe) => recipe,
            None => return Ok(None),
        };
        token.check()?;

        let (title, instructions, category, area, tags, ingredients) = tokio::join!(
            self.localize(&recipe.title),
            self.localize(&recipe.instructions),
            self.localize(&recipe.category),
            self.localize(&recipe.area),
            self.localize(&recipe.tags),
            join_all(recipe.ingredients.iter().map(|line| self.localize(line))),
        );

        let instruction_lines: Vec<String> = instructions
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let is_favorite = self.favorites.is_favorite(id)?;
        token.check()?;

        Ok(Some(LocalizedRecipeDetail {
            id: recipe.id,
            title,
            image_url: recipe.image_url,
            category,
            area,
            tags,
            ingredients,
            instruction_lines,
            is_favorite,
        }))
    }

    /// Flip the favorite state of a recipe and return the new state.
    ///
    /// `title`/`image_url` are the already-localized values captured by the
    /// caller at render time; they become the stored snapshot on add.
    pub fn toggle_favorite(&self, id: &str, title: &str, image_url: &str) -> AppResult<bool> {
        if self.favorites.is_favorite(id)? {
            self.favorites.remove(id)?;
            Ok(false)
        } else {
            self.favorites.add(id, title, image_url)?;
            Ok(true)
        }
    }

    async fn localize(&self, text: &str) -> String {
        self.translator
            .translate_or_original(text, self.recipe_lang, self.user_lang)
            .await
    }

    async fn localize_summaries(&self, rows: Vec<RecipeSummary>) -> Vec<LocalizedSummary> {
        join_all(rows.into_iter().map(|row| async move {
            let title = self.localize(&row.title).await;
            LocalizedSummary {
                id: row.id,
                title,
                image_url: row.image_url,
            }
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::core::recipes::Recipe;
    use crate::core::translator::{TranslationRequest, TranslateProvider};
    use crate::shared::error::AppError;

    /// Prefixes translations with the target code; fails for listed texts.
    struct SelectiveProvider {
        fail_texts: Vec<String>,
        calls: AtomicUsize,
    }

    impl SelectiveProvider {
        fn new(fail_texts: &[&str]) -> Self {
            Self {
                fail_texts: fail_texts.iter().map(|s| (*s).to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranslateProvider for SelectiveProvider {
        async fn translate(&self, request: &TranslationRequest) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_texts.contains(&request.text) {
                return Err(AppError::Network("timed out".to_string()));
            }
            Ok(format!("ru:{}", request.text))
        }
    }

    /// Canned recipe source that records the ingredient term it was asked
    /// for and can cancel a token mid-flight to simulate the user leaving.
    struct FakeSource {
        by_category: Vec<RecipeSummary>,
        by_ingredient: Vec<RecipeSummary>,
        detail: Option<Recipe>,
        seen_ingredient: Mutex<Option<String>>,
        cancel_during_call: Option<NavigationToken>,
    }

    impl FakeSource {
        fn empty() -> Self {
            Self {
                by_category: Vec::new(),
                by_ingredient: Vec::new(),
                detail: None,
                seen_ingredient: Mutex::new(None),
                cancel_during_call: None,
            }
        }

        fn cancel_if_asked(&self) {
            if let Some(token) = &self.cancel_during_call {
                token.cancel();
            }
        }
    }

    #[async_trait]
    impl RecipeSource for FakeSource {
        async fn list_by_category(&self, _category: &str) -> Vec<RecipeSummary> {
            self.cancel_if_asked();
            self.by_category.clone()
        }

        async fn list_by_ingredient(&self, ingredient: &str) -> Vec<RecipeSummary> {
            self.cancel_if_asked();
            *self.seen_ingredient.lock().unwrap() = Some(ingredient.to_string());
            if ingredient.is_empty() {
                return Vec::new();
            }
            self.by_ingredient.clone()
        }

        async fn fetch_detail(&self, _id: &str) -> Option<Recipe> {
            self.cancel_if_asked();
            self.detail.clone()
        }
    }

    fn summary(id: &str, title: &str) -> RecipeSummary {
        RecipeSummary {
            id: id.to_string(),
            title: title.to_string(),
            image_url: format!("http://x/{}.jpg", id),
        }
    }

    fn sample_detail() -> Recipe {
        Recipe {
            id: "52977".to_string(),
            title: "Corba".to_string(),
            image_url: "http://x/corba.jpg".to_string(),
            category: "Side".to_string(),
            area: "Turkish".to_string(),
            tags: "".to_string(),
            instructions: "Soak the lentils.\n\n  \nBoil gently.".to_string(),
            ingredients: vec!["Lentils - 1 cup".to_string(), "Salt".to_string()],
        }
    }

    struct Fixture {
        orchestrator: RecipeOrchestrator,
        source: Arc<FakeSource>,
        _dir: tempfile::TempDir,
    }

    fn fixture(source: FakeSource, provider: SelectiveProvider) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let favorites =
            Arc::new(FavoritesStore::open(&dir.path().join("favorites.redb")).unwrap());
        let source = Arc::new(source);
        let orchestrator = RecipeOrchestrator::new(
            source.clone(),
            Arc::new(TranslationService::new(Arc::new(provider))),
            favorites,
            Language::Rus,
            Language::Eng,
        );
        Fixture {
            orchestrator,
            source,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_browse_category_preserves_source_order() {
        let mut source = FakeSource::empty();
        source.by_category = vec![summary("1", "Beef Stew"), summary("2", "Beef Wellington")];
        let fx = fixture(source, SelectiveProvider::new(&[]));

        let listing = fx
            .orchestrator
            .browse_category("Beef", &NavigationToken::new())
            .await
            .unwrap();

        assert_eq!(listing.label, "ru:Beef");
        let titles: Vec<String> = listing.recipes.iter().map(|r| r.title.clone()).collect();
        assert_eq!(titles, vec!["ru:Beef Stew", "ru:Beef Wellington"]);
    }

    #[tokio::test]
    async fn test_search_translates_query_before_filtering() {
        let mut source = FakeSource::empty();
        source.by_ingredient = vec![summary("3", "Chicken Soup")];
        let fx = fixture(source, SelectiveProvider::new(&[]));

        let results = fx
            .orchestrator
            .search("курица", &NavigationToken::new())
            .await
            .unwrap();

        assert_eq!(
            fx.source.seen_ingredient.lock().unwrap().as_deref(),
            Some("ru:курица") // The provider-translated term reached the source
        );
        assert_eq!(results[0].title, "ru:Chicken Soup");
    }

    #[tokio::test]
    async fn test_search_runs_with_original_query_when_translation_fails() {
        let mut source = FakeSource::empty();
        source.by_ingredient = vec![summary("3", "Chicken Soup")];
        let fx = fixture(source, SelectiveProvider::new(&["курица"]));

        let results = fx
            .orchestrator
            .search("курица", &NavigationToken::new())
            .await
            .unwrap();

        assert_eq!(
            fx.source.seen_ingredient.lock().unwrap().as_deref(),
            Some("курица")
        );
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_with_empty_query_returns_empty_list() {
        let fx = fixture(FakeSource::empty(), SelectiveProvider::new(&[]));

        let results = fx
            .orchestrator
            .search("", &NavigationToken::new())
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_open_recipe_not_found() {
        let fx = fixture(FakeSource::empty(), SelectiveProvider::new(&[]));

        let detail = fx
            .orchestrator
            .open_recipe("99999999", &NavigationToken::new())
            .await
            .unwrap();

        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn test_open_recipe_localizes_all_fields() {
        let mut source = FakeSource::empty();
        source.detail = Some(sample_detail());
        let fx = fixture(source, SelectiveProvider::new(&[]));

        let detail = fx
            .orchestrator
            .open_recipe("52977", &NavigationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(detail.title, "ru:Corba");
        assert_eq!(detail.category, "ru:Side");
        assert_eq!(detail.area, "ru:Turkish");
        assert_eq!(detail.tags, ""); // Empty field short-circuits untranslated
        assert_eq!(
            detail.ingredients,
            vec!["ru:Lentils - 1 cup", "ru:Salt"]
        );
        // Lines are split after translating the whole block
        assert_eq!(
            detail.instruction_lines,
            vec!["ru:Soak the lentils.", "Boil gently."]
        );
        assert!(!detail.is_favorite);
    }

    #[tokio::test]
    async fn test_open_recipe_degrades_only_the_failing_field() {
        let mut source = FakeSource::empty();
        source.detail = Some(sample_detail());
        let fx = fixture(source, SelectiveProvider::new(&["Turkish", "Salt"]));

        let detail = fx
            .orchestrator
            .open_recipe("52977", &NavigationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(detail.area, "Turkish"); // Source-language fallback
        assert_eq!(detail.ingredients, vec!["ru:Lentils - 1 cup", "Salt"]);
        assert_eq!(detail.title, "ru:Corba"); // The rest still localized
    }

    #[tokio::test]
    async fn test_open_recipe_reports_favorite_status() {
        let mut source = FakeSource::empty();
        source.detail = Some(sample_detail());
        let fx = fixture(source, SelectiveProvider::new(&[]));
        fx.orchestrator
            .favorites()
            .add("52977", "ru:Corba", "http://x/corba.jpg")
            .unwrap();

        let detail = fx
            .orchestrator
            .open_recipe("52977", &NavigationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert!(detail.is_favorite);
    }

    #[tokio::test]
    async fn test_toggle_favorite_roundtrip() {
        let fx = fixture(FakeSource::empty(), SelectiveProvider::new(&[]));

        let state = fx
            .orchestrator
            .toggle_favorite("52977", "Короккэ", "http://x/y.jpg")
            .unwrap();
        assert!(state);
        assert_eq!(
            fx.orchestrator.favorites().most_recent().unwrap().unwrap().title,
            "Короккэ"
        );

        let state = fx
            .orchestrator
            .toggle_favorite("52977", "Короккэ", "http://x/y.jpg")
            .unwrap();
        assert!(!state);
        assert!(fx.orchestrator.favorites().all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_categories_carries_catalog_codes_and_labels() {
        let fx = fixture(FakeSource::empty(), SelectiveProvider::new(&[]));

        let categories = fx
            .orchestrator
            .list_categories(&NavigationToken::new())
            .await
            .unwrap();

        let codes: Vec<String> = categories.iter().map(|c| c.code.clone()).collect();
        assert_eq!(codes, vec!["Chicken", "Beef", "Seafood"]);
        assert_eq!(categories[0].label, "ru:Chicken");
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let fx = fixture(FakeSource::empty(), SelectiveProvider::new(&[]));
        let token = NavigationToken::new();
        token.cancel();

        assert!(matches!(
            fx.orchestrator.browse_category("Beef", &token).await,
            Err(AppError::Cancelled)
        ));
        assert!(matches!(
            fx.orchestrator.search("курица", &token).await,
            Err(AppError::Cancelled)
        ));
        assert!(matches!(
            fx.orchestrator.open_recipe("52977", &token).await,
            Err(AppError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_mid_flight_cancellation_discards_results() {
        // The source cancels the token during its call, as if the user
        // navigated away while the request was in flight.
        let token = NavigationToken::new();
        let mut source = FakeSource::empty();
        source.by_category = vec![summary("1", "Beef Stew")];
        source.cancel_during_call = Some(token.clone());
        let fx = fixture(source, SelectiveProvider::new(&[]));

        let result = fx.orchestrator.browse_category("Beef", &token).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
    }
}
