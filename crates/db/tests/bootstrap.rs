//! Full bootstrap tests: connect, migrate, seed, and the one-time secret
//! bootstrap.

use lookbook_db::models::setting;
use lookbook_db::repositories::SettingsRepo;
use lookbook_db::secrets::SecretEncryptor;
use lookbook_db::{bootstrap_secrets, SecretSources};
use sqlx::SqlitePool;

const TEST_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

#[sqlx::test]
async fn schema_and_seed_rows_present(pool: SqlitePool) {
    lookbook_db::health_check(&pool).await.unwrap();

    for table in ["history", "history_media", "users", "settings"] {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "{table} should exist");
    }

    assert_eq!(
        SettingsRepo::get(&pool, setting::REGISTRATION_ENABLED)
            .await
            .unwrap()
            .as_deref(),
        Some("true")
    );
    assert_eq!(
        SettingsRepo::get(&pool, setting::IMAGE_API_KEY)
            .await
            .unwrap()
            .as_deref(),
        Some("")
    );
}

#[sqlx::test]
async fn rerunning_migrations_keeps_operator_settings(pool: SqlitePool) {
    SettingsRepo::set(&pool, setting::REGISTRATION_ENABLED, "false")
        .await
        .unwrap();

    // A restart re-applies the migrator; seeds are INSERT OR IGNORE.
    lookbook_db::MIGRATOR.run(&pool).await.unwrap();

    assert_eq!(
        SettingsRepo::get(&pool, setting::REGISTRATION_ENABLED)
            .await
            .unwrap()
            .as_deref(),
        Some("false")
    );
}

#[tokio::test]
async fn connect_creates_file_and_is_idempotent() {
    let dir = std::env::temp_dir().join(format!("lookbook-test-{}", uuid::Uuid::new_v4()));
    let path = dir.join("history.db");

    let pool = lookbook_db::connect(&path).await.unwrap();
    lookbook_db::health_check(&pool).await.unwrap();
    SettingsRepo::set(&pool, setting::REGISTRATION_ENABLED, "false")
        .await
        .unwrap();
    pool.close().await;

    // Second boot against the same file: no data loss, no DDL errors.
    let pool = lookbook_db::connect(&path).await.unwrap();
    assert_eq!(
        SettingsRepo::get(&pool, setting::REGISTRATION_ENABLED)
            .await
            .unwrap()
            .as_deref(),
        Some("false")
    );
    pool.close().await;

    std::fs::remove_dir_all(&dir).ok();
}

#[sqlx::test]
async fn secret_bootstrap_fills_empty_settings_once(pool: SqlitePool) {
    let encryptor = SecretEncryptor::from_hex_key(TEST_KEY).unwrap();
    let sources = SecretSources {
        image_api_key: Some("sk-image-1".to_string()),
        video_api_key: None,
    };

    bootstrap_secrets(&pool, &encryptor, &sources).await.unwrap();

    let stored = SettingsRepo::get(&pool, setting::IMAGE_API_KEY)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_empty());
    assert_ne!(stored, "sk-image-1");
    assert_eq!(encryptor.decrypt(&stored).unwrap(), "sk-image-1");

    // Absent source leaves the seeded empty value alone.
    assert_eq!(
        SettingsRepo::get(&pool, setting::VIDEO_API_KEY)
            .await
            .unwrap()
            .as_deref(),
        Some("")
    );

    // A later boot with a different env value must not overwrite.
    let changed = SecretSources {
        image_api_key: Some("sk-image-2".to_string()),
        video_api_key: None,
    };
    bootstrap_secrets(&pool, &encryptor, &changed).await.unwrap();
    let unchanged = SettingsRepo::get(&pool, setting::IMAGE_API_KEY)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(encryptor.decrypt(&unchanged).unwrap(), "sk-image-1");
}

#[sqlx::test]
async fn secret_bootstrap_fills_each_secret_from_its_own_source(pool: SqlitePool) {
    let encryptor = SecretEncryptor::from_hex_key(TEST_KEY).unwrap();
    let sources = SecretSources {
        image_api_key: Some("sk-image".to_string()),
        video_api_key: Some("sk-video".to_string()),
    };

    bootstrap_secrets(&pool, &encryptor, &sources).await.unwrap();

    for (key, expected) in [
        (setting::IMAGE_API_KEY, "sk-image"),
        (setting::VIDEO_API_KEY, "sk-video"),
    ] {
        let stored = SettingsRepo::get(&pool, key).await.unwrap().unwrap();
        assert_eq!(encryptor.decrypt(&stored).unwrap(), expected, "{key}");
    }
}

#[sqlx::test]
async fn secret_bootstrap_respects_operator_configured_values(pool: SqlitePool) {
    let encryptor = SecretEncryptor::from_hex_key(TEST_KEY).unwrap();
    SettingsRepo::set(&pool, setting::VIDEO_API_KEY, "operator-set")
        .await
        .unwrap();

    let sources = SecretSources {
        image_api_key: None,
        video_api_key: Some("sk-video-env".to_string()),
    };
    bootstrap_secrets(&pool, &encryptor, &sources).await.unwrap();

    assert_eq!(
        SettingsRepo::get(&pool, setting::VIDEO_API_KEY)
            .await
            .unwrap()
            .as_deref(),
        Some("operator-set")
    );
}

#[sqlx::test]
async fn settings_upsert_replaces_value(pool: SqlitePool) {
    SettingsRepo::set(&pool, "custom_key", "one").await.unwrap();
    SettingsRepo::set(&pool, "custom_key", "two").await.unwrap();
    assert_eq!(
        SettingsRepo::get(&pool, "custom_key").await.unwrap().as_deref(),
        Some("two")
    );

    let all = SettingsRepo::get_all(&pool).await.unwrap();
    assert!(all.iter().any(|s| s.key == "custom_key" && s.value == "two"));
}
