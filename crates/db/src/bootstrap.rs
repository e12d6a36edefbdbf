//! One-time secret bootstrap at startup.
//!
//! An explicit, logged, idempotent step: for each known secret setting
//! whose persisted value is empty, take the value from process
//! configuration (when present), encrypt it, and store it. Operator-set
//! values are never overwritten.

use sqlx::SqlitePool;

use crate::models::setting;
use crate::repositories::SettingsRepo;
use crate::secrets::{SecretEncryptor, SecretError};

/// Environment variable holding the global image-provider API key.
pub const IMAGE_API_KEY_ENV_VAR: &str = "LOOKBOOK_IMAGE_API_KEY";

/// Environment variable holding the global video-provider API key.
pub const VIDEO_API_KEY_ENV_VAR: &str = "LOOKBOOK_VIDEO_API_KEY";

/// Errors raised while bootstrapping secrets.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Secret(#[from] SecretError),
}

/// External configuration values consulted on first run.
#[derive(Debug, Clone, Default)]
pub struct SecretSources {
    pub image_api_key: Option<String>,
    pub video_api_key: Option<String>,
}

impl SecretSources {
    /// Read secret sources from the process environment. Empty values are
    /// treated as absent.
    pub fn from_env() -> Self {
        SecretSources {
            image_api_key: read_env(IMAGE_API_KEY_ENV_VAR),
            video_api_key: read_env(VIDEO_API_KEY_ENV_VAR),
        }
    }

    /// The source value for one of [`setting::SECRET_KEYS`].
    fn value_for(&self, key: &str) -> Option<&str> {
        match key {
            setting::IMAGE_API_KEY => self.image_api_key.as_deref(),
            setting::VIDEO_API_KEY => self.video_api_key.as_deref(),
            _ => None,
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Store each available secret whose persisted setting is still empty.
/// Safe to call on every startup.
pub async fn bootstrap_secrets(
    pool: &SqlitePool,
    encryptor: &SecretEncryptor,
    sources: &SecretSources,
) -> Result<(), BootstrapError> {
    for key in setting::SECRET_KEYS {
        let Some(value) = sources.value_for(key) else {
            continue;
        };

        if SettingsRepo::get(pool, key)
            .await?
            .is_some_and(|existing| !existing.is_empty())
        {
            tracing::debug!(setting = key, "secret already configured, skipping");
            continue;
        }

        let encrypted = encryptor.encrypt(value)?;
        SettingsRepo::set(pool, key, &encrypted).await?;
        tracing::info!(setting = key, "bootstrapped secret from process configuration");
    }

    Ok(())
}
