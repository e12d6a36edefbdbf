//! User account models and DTOs.
//!
//! Users are created and deleted by admin actions; the history core only
//! reads them to resolve per-user generation defaults. Password hashing
//! happens upstream; the hash column is opaque here.

use lookbook_core::types::TimestampMs;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Whether generation calls use the global provider key or the user's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Global,
    Personal,
}

/// A row from the `users` table.
///
/// **Note:** `password_hash` and key material are never serialized to
/// responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub image_api_key: Option<String>,
    pub image_key_mode: KeyMode,
    #[serde(skip_serializing)]
    pub video_api_key: Option<String>,
    pub video_key_mode: KeyMode,
    pub generation_model: Option<String>,
    pub created_at: TimestampMs,
}

/// DTO for creating a user (admin action).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub role: Option<Role>,
}

/// DTO for partial user updates. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub image_api_key: Option<String>,
    pub image_key_mode: Option<KeyMode>,
    pub video_api_key: Option<String>,
    pub video_key_mode: Option<KeyMode>,
    pub generation_model: Option<String>,
}

/// What the orchestration layer needs when accepting a job for a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationDefaults {
    pub generation_model: Option<String>,
    pub image_key_mode: KeyMode,
    pub video_key_mode: KeyMode,
}
