//! Repository for the `history` table: job CRUD with transactional safety.
//!
//! Concurrency contract: every mutation is a single engine-level
//! transaction. Scalars use COALESCE ("update if provided"), JSON columns
//! use SQLite's `json_patch` so a user-triggered edit and an async worker
//! callback patching disjoint keys can never clobber each other, and slot
//! arrays are replaced wholesale. No application-level read-modify-write.

use lookbook_core::types::now_ms;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::job::{CreateJob, Job, JobRow, UpdateJob};
use crate::models::media::SlotType;
use crate::repositories::MediaSlotRepo;

/// Column list for `history` queries.
const COLUMNS: &str = "\
    id, owner, created_at, prompt, source_media_url, settings_mode, \
    generation_model, attributes, video_params, status, error, callback_url";

/// Provides CRUD operations for generation jobs.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Insert a job with `status = processing`, plus its initial non-null
    /// media slot rows, in one transaction. Returns the hydrated job.
    ///
    /// Retried inserts with the same id are tolerated: the conflict path
    /// refreshes the creation fields but leaves the lifecycle columns
    /// (`status`, `error`) alone, so a retry can never un-complete a job.
    /// Deliberately not `INSERT OR REPLACE` — REPLACE deletes the old row
    /// and would cascade-delete its media.
    pub async fn insert(pool: &SqlitePool, input: &CreateJob) -> Result<Job, sqlx::Error> {
        let id = input
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let created_at = input.created_at.unwrap_or_else(now_ms);
        let attributes = input
            .attributes
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "{}".to_string());
        let video_params = input.video_params.as_ref().map(ToString::to_string);

        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO history \
                 (id, owner, created_at, prompt, source_media_url, settings_mode, \
                  generation_model, attributes, video_params, status, callback_url) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'processing', ?10) \
             ON CONFLICT(id) DO UPDATE SET \
                 owner = excluded.owner, \
                 created_at = excluded.created_at, \
                 prompt = excluded.prompt, \
                 source_media_url = excluded.source_media_url, \
                 settings_mode = excluded.settings_mode, \
                 generation_model = excluded.generation_model, \
                 attributes = excluded.attributes, \
                 video_params = excluded.video_params, \
                 callback_url = excluded.callback_url",
        )
        .bind(&id)
        .bind(&input.owner)
        .bind(created_at)
        .bind(&input.prompt)
        .bind(&input.source_media_url)
        .bind(&input.settings_mode)
        .bind(&input.generation_model)
        .bind(&attributes)
        .bind(&video_params)
        .bind(&input.callback_url)
        .execute(&mut *tx)
        .await?;

        for (slot_type, urls) in [
            (SlotType::Edited, &input.edited_urls),
            (SlotType::OriginalForComparison, &input.original_urls),
            (SlotType::GeneratedVideo, &input.video_urls),
        ] {
            MediaSlotRepo::write_slots(&mut tx, &id, slot_type, urls).await?;
        }

        tx.commit().await?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a job by id, hydrated with its three slot arrays.
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM history WHERE id = ?1");
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        let Some(row) = row else { return Ok(None) };
        let media = MediaSlotRepo::read_all(pool, id).await?;
        Ok(Some(row.into_job(media)))
    }

    /// Apply a partial update in one transaction. Returns `false` (a logged
    /// no-op, not an error) when the job does not exist — an async
    /// completion callback racing a delete must not crash.
    ///
    /// - Scalars: `COALESCE(new, old)`.
    /// - `status`: monotonic; a terminal status never reverts to processing.
    /// - `attributes` / `video_params`: engine-side RFC 7386 merge patch.
    /// - Slot arrays, when provided: replace-all per slot type.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        input: &UpdateJob,
    ) -> Result<bool, sqlx::Error> {
        let attributes_patch = input.attributes.as_ref().map(ToString::to_string);
        let video_params_patch = input.video_params.as_ref().map(ToString::to_string);

        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE history SET \
                 prompt = COALESCE(?2, prompt), \
                 settings_mode = COALESCE(?3, settings_mode), \
                 error = COALESCE(?4, error), \
                 status = CASE \
                     WHEN ?5 IS NULL THEN status \
                     WHEN status IN ('completed', 'failed') AND ?5 = 'processing' THEN status \
                     ELSE ?5 \
                 END, \
                 attributes = CASE \
                     WHEN ?6 IS NULL THEN attributes \
                     ELSE json_patch(attributes, ?6) \
                 END, \
                 video_params = CASE \
                     WHEN ?7 IS NULL THEN video_params \
                     ELSE json_patch(COALESCE(video_params, '{}'), ?7) \
                 END \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&input.prompt)
        .bind(&input.settings_mode)
        .bind(&input.error)
        .bind(input.status)
        .bind(&attributes_patch)
        .bind(&video_params_patch)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(job_id = id, "update of missing job ignored");
            return Ok(false);
        }

        for (slot_type, urls) in [
            (SlotType::Edited, &input.edited_urls),
            (SlotType::OriginalForComparison, &input.original_urls),
            (SlotType::GeneratedVideo, &input.video_urls),
        ] {
            if let Some(urls) = urls {
                MediaSlotRepo::write_slots(&mut tx, id, slot_type, urls).await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a job. Foreign-key cascade removes its media rows in the same
    /// transaction. Missing id is a logged no-op.
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            tracing::warn!(job_id = id, "delete of missing job ignored");
        }
        Ok(result.rows_affected() > 0)
    }

    /// Owner-scoped delete for the user-facing path: removes the job only
    /// when it belongs to `owner`.
    pub async fn delete_for_owner(
        pool: &SqlitePool,
        id: &str,
        owner: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE id = ?1 AND owner = ?2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
