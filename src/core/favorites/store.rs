//! Persistent favorites.
//!
//! One redb table keyed by meal id. Each value is a JSON record carrying the
//! title/image snapshot plus a monotonic insertion sequence; the reserved
//! `__next_seq` key inside the same table holds the counter. Reads order by
//! sequence descending, which recovers insertion order across restarts.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::FavoriteEntry;

const FAVORITES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("favorites");
const NEXT_SEQ_KEY: &str = "__next_seq";

#[derive(Debug, Serialize, Deserialize)]
struct StoredFavorite {
    title: String,
    image_url: String,
    seq: u64,
    added_at: i64,
}

/// Deduplicated, insertion-ordered favorites store.
///
/// All operations fail only when the underlying storage is unusable.
/// Writes are serialized by redb's single-writer transactions.
pub struct FavoritesStore {
    db: Database,
}

impl FavoritesStore {
    /// Open (or create) the store at `path`.
    ///
    /// Creating the schema when it does not yet exist leaves existing data
    /// untouched, so opening is idempotent.
    pub fn open(path: &Path) -> AppResult<Self> {
        let db = Database::create(path).map_err(|e| AppError::Persistence(e.to_string()))?;

        let txn = db
            .begin_write()
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        txn.open_table(FAVORITES_TABLE)
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        txn.commit()
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(Self { db })
    }

    /// Insert-or-ignore keyed by meal id. An already-favorited id is left
    /// untouched: the stored title/image snapshot is not updated.
    pub fn add(&self, meal_id: &str, title: &str, image_url: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        {
            let mut table = txn
                .open_table(FAVORITES_TABLE)
                .map_err(|e| AppError::Persistence(e.to_string()))?;

            let exists = table
                .get(meal_id)
                .map_err(|e| AppError::Persistence(e.to_string()))?
                .is_some();

            if !exists {
                let seq = match table
                    .get(NEXT_SEQ_KEY)
                    .map_err(|e| AppError::Persistence(e.to_string()))?
                {
                    Some(value) => value.value().parse::<u64>().unwrap_or(0),
                    None => 0,
                };

                let record = StoredFavorite {
                    title: title.to_string(),
                    image_url: image_url.to_string(),
                    seq,
                    added_at: Utc::now().timestamp(),
                };
                let serialized = serde_json::to_string(&record)
                    .map_err(|e| AppError::Persistence(e.to_string()))?;
                table
                    .insert(meal_id, serialized.as_str())
                    .map_err(|e| AppError::Persistence(e.to_string()))?;

                let next = (seq + 1).to_string();
                table
                    .insert(NEXT_SEQ_KEY, next.as_str())
                    .map_err(|e| AppError::Persistence(e.to_string()))?;
            }
        }
        txn.commit()
            .map_err(|e| AppError::Persistence(e.to_string()))
    }

    /// Delete by meal id; removing an absent id is a no-op.
    pub fn remove(&self, meal_id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        {
            let mut table = txn
                .open_table(FAVORITES_TABLE)
                .map_err(|e| AppError::Persistence(e.to_string()))?;
            table
                .remove(meal_id)
                .map_err(|e| AppError::Persistence(e.to_string()))?;
        }
        txn.commit()
            .map_err(|e| AppError::Persistence(e.to_string()))
    }

    pub fn is_favorite(&self, meal_id: &str) -> AppResult<bool> {
        if meal_id == NEXT_SEQ_KEY {
            return Ok(false);
        }
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        let table = txn
            .open_table(FAVORITES_TABLE)
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(table
            .get(meal_id)
            .map_err(|e| AppError::Persistence(e.to_string()))?
            .is_some())
    }

    /// The single most recently added favorite.
    pub fn most_recent(&self) -> AppResult<Option<FavoriteEntry>> {
        Ok(self.all()?.into_iter().next())
    }

    /// All favorites, most recently added first.
    pub fn all(&self) -> AppResult<Vec<FavoriteEntry>> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        let table = txn
            .open_table(FAVORITES_TABLE)
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        let mut entries: Vec<(u64, FavoriteEntry)> = Vec::new();
        for item in table
            .iter()
            .map_err(|e| AppError::Persistence(e.to_string()))?
        {
            let (key, value) = item.map_err(|e| AppError::Persistence(e.to_string()))?;
            let meal_id = key.value();
            if meal_id == NEXT_SEQ_KEY {
                continue;
            }

            match serde_json::from_str::<StoredFavorite>(value.value()) {
                Ok(record) => entries.push((
                    record.seq,
                    FavoriteEntry {
                        meal_id: meal_id.to_string(),
                        title: record.title,
                        image_url: record.image_url,
                    },
                )),
                Err(e) => {
                    eprintln!("[Favorites] Skipping unreadable record {}: {}", meal_id, e);
                }
            }
        }

        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries.into_iter().map(|(_, entry)| entry).collect())
    }
}
