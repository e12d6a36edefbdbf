//! Integration tests for the polling status bridge: ownership boundary
//! and nested video-status precedence.

use lookbook_db::models::job::{CreateJob, JobStatus, UpdateJob};
use lookbook_db::models::media::SlotArray;
use lookbook_db::repositories::{HistoryRepo, StatusRepo};
use serde_json::json;
use sqlx::SqlitePool;

fn slots(entries: [Option<&str>; 4]) -> SlotArray {
    entries.map(|entry| entry.map(str::to_string))
}

fn image_job(id: &str, owner: &str) -> CreateJob {
    CreateJob {
        id: Some(id.to_string()),
        owner: owner.to_string(),
        prompt: "p".to_string(),
        ..Default::default()
    }
}

#[sqlx::test]
async fn missing_job_returns_none(pool: SqlitePool) {
    assert!(StatusRepo::get_status(&pool, "ghost", "alice")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn foreign_owner_returns_none(pool: SqlitePool) {
    HistoryRepo::insert(&pool, &image_job("j1", "alice")).await.unwrap();

    // Absence and denial are indistinguishable on purpose.
    assert!(StatusRepo::get_status(&pool, "j1", "mallory")
        .await
        .unwrap()
        .is_none());
    assert!(StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test]
async fn processing_image_job_reports_top_level_status(pool: SqlitePool) {
    HistoryRepo::insert(&pool, &image_job("j1", "alice")).await.unwrap();

    let view = StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status, "processing");
    assert!(view.error.is_none());
    assert!(view.edited_urls.is_none());
    assert!(view.video_url.is_none());
}

#[sqlx::test]
async fn completed_image_job_includes_edited_urls(pool: SqlitePool) {
    HistoryRepo::insert(&pool, &image_job("j1", "alice")).await.unwrap();
    HistoryRepo::update(
        &pool,
        "j1",
        &UpdateJob {
            status: Some(JobStatus::Completed),
            edited_urls: Some(slots([Some("/img/a.png"), None, None, None])),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let view = StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status, "completed");
    assert_eq!(
        view.edited_urls,
        Some(slots([Some("/img/a.png"), None, None, None]))
    );
}

#[sqlx::test]
async fn failed_job_reports_error(pool: SqlitePool) {
    HistoryRepo::insert(&pool, &image_job("j1", "alice")).await.unwrap();
    HistoryRepo::update(
        &pool,
        "j1",
        &UpdateJob {
            status: Some(JobStatus::Failed),
            error: Some("provider quota exceeded".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let view = StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status, "failed");
    assert_eq!(view.error.as_deref(), Some("provider quota exceeded"));
}

#[sqlx::test]
async fn nested_video_status_takes_precedence(pool: SqlitePool) {
    let mut input = image_job("j1", "alice");
    input.video_params = Some(json!({
        "mode": "standalone",
        "status": "rendering",
        "videoUrl": "/vid/remote.mp4",
        "localVideoUrl": "/vid/local.mp4"
    }));
    HistoryRepo::insert(&pool, &input).await.unwrap();

    let view = StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .unwrap();
    // Top-level column still says processing; the nested object wins.
    assert_eq!(view.status, "rendering");
    assert_eq!(view.video_url.as_deref(), Some("/vid/remote.mp4"));
    assert_eq!(view.local_video_url.as_deref(), Some("/vid/local.mp4"));
    assert!(view.edited_urls.is_none());
}

#[sqlx::test]
async fn video_job_without_nested_status_falls_back(pool: SqlitePool) {
    let mut input = image_job("j1", "alice");
    input.video_params = Some(json!({"mode": "standalone"}));
    HistoryRepo::insert(&pool, &input).await.unwrap();

    let view = StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status, "processing");
}

#[sqlx::test]
async fn nested_error_overrides_top_level(pool: SqlitePool) {
    let mut input = image_job("j1", "alice");
    input.video_params = Some(json!({"status": "failed", "error": "render timeout"}));
    HistoryRepo::insert(&pool, &input).await.unwrap();

    let view = StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status, "failed");
    assert_eq!(view.error.as_deref(), Some("render timeout"));
}

#[sqlx::test]
async fn malformed_video_params_fall_back_to_top_level(pool: SqlitePool) {
    HistoryRepo::insert(&pool, &image_job("j1", "alice")).await.unwrap();
    sqlx::query("UPDATE history SET video_params = '{oops' WHERE id = 'j1'")
        .execute(&pool)
        .await
        .unwrap();

    let view = StatusRepo::get_status(&pool, "j1", "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status, "processing");
}
