//! Key/value settings model and the well-known setting keys.

use serde::Serialize;
use sqlx::FromRow;

/// A row from the `settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Feature flag: whether self-service registration is open.
pub const REGISTRATION_ENABLED: &str = "registration_enabled";

/// Fallback model used when a user has no personal default.
pub const DEFAULT_GENERATION_MODEL: &str = "default_generation_model";

/// Global image-provider API key, stored encrypted. Seeded empty; filled
/// by the one-time secret bootstrap or by an admin.
pub const IMAGE_API_KEY: &str = "image_api_key";

/// Global video-provider API key, stored encrypted.
pub const VIDEO_API_KEY: &str = "video_api_key";

/// Settings whose values are encrypted at rest.
pub const SECRET_KEYS: [&str; 2] = [IMAGE_API_KEY, VIDEO_API_KEY];
