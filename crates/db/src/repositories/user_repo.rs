//! Repository for the `users` table.
//!
//! Mutations are admin-panel operations; the history core itself only
//! reads generation defaults when a job is accepted.

use lookbook_core::types::now_ms;
use sqlx::SqlitePool;

use crate::models::user::{CreateUser, GenerationDefaults, Role, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    username, password_hash, role, image_api_key, image_key_mode, \
    video_api_key, video_key_mode, generation_model, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row. A duplicate username
    /// surfaces as a database constraint error.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, role, created_at) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.role.unwrap_or(Role::User))
            .bind(now_ms())
            .fetch_one(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users, most recently created first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `username` exists.
    pub async fn update(
        pool: &SqlitePool,
        username: &str,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 password_hash = COALESCE(?2, password_hash), \
                 role = COALESCE(?3, role), \
                 image_api_key = COALESCE(?4, image_api_key), \
                 image_key_mode = COALESCE(?5, image_key_mode), \
                 video_api_key = COALESCE(?6, video_api_key), \
                 video_key_mode = COALESCE(?7, video_key_mode), \
                 generation_model = COALESCE(?8, generation_model) \
             WHERE username = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(&input.password_hash)
            .bind(input.role)
            .bind(&input.image_api_key)
            .bind(input.image_key_mode)
            .bind(&input.video_api_key)
            .bind(input.video_key_mode)
            .bind(&input.generation_model)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. Their history is untouched: job ownership is not a
    /// foreign key, so user and job lifecycles stay independent.
    pub async fn delete(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?1")
            .bind(username)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve the model and key-routing defaults the orchestration layer
    /// needs when accepting a job for this user.
    pub async fn generation_defaults(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<GenerationDefaults>, sqlx::Error> {
        sqlx::query_as::<_, GenerationDefaults>(
            "SELECT generation_model, image_key_mode, video_key_mode \
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }
}
