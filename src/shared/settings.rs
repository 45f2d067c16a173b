use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::shared::error::{AppError, AppResult};

const FAVORITES_DB_FILE: &str = "favorites.redb";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub preferences: UserPreferences,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Language the user reads ("ru").
    pub user_lang: String,
    /// Language the recipe source publishes in ("en").
    pub recipe_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub recipe_api_base: String,
    pub translate_api_base: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            preferences: UserPreferences {
                user_lang: "ru".to_string(),
                recipe_lang: "en".to_string(),
            },
            endpoints: Endpoints {
                recipe_api_base: "https://www.themealdb.com/api/json/v1/1".to_string(),
                translate_api_base: "https://translate.googleapis.com".to_string(),
            },
        }
    }
}

impl AppSettings {
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "CulinaryMastermind", "culinary-mastermind")
            .ok_or_else(|| AppError::Persistence("Failed to determine config directory".to_string()))
    }

    pub fn get_settings_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("settings.json"))
    }

    /// Where the favorites database lives. The directory is created on demand.
    pub async fn favorites_db_path() -> AppResult<PathBuf> {
        let mut path = Self::project_dirs()?.data_dir().to_path_buf();
        fs::create_dir_all(&path)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        path.push(FAVORITES_DB_FILE);
        Ok(path)
    }

    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;

        if !path.exists() {
            let settings = Self::default();
            settings.save().await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save(&self) -> AppResult<()> {
        let path = Self::get_settings_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Persistence(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Validation(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&path, content)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to write settings file: {}", e)))
    }
}
