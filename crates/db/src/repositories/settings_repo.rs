//! Repository for the `settings` key/value table.

use sqlx::SqlitePool;

use crate::models::setting::Setting;

/// Provides typed access to operator settings.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch one setting value.
    pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Upsert one setting value.
    pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List every setting row, ordered by key for stable admin display.
    pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(pool)
            .await
    }
}
