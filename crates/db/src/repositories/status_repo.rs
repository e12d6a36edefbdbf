//! Polling-oriented status reads, distinct from full job hydration.

use sqlx::{FromRow, SqlitePool};

use crate::models::job::{JobStatus, JobStatusView};
use crate::models::media::SlotType;
use crate::repositories::MediaSlotRepo;

/// Minimal projection fetched for a poll.
#[derive(Debug, FromRow)]
struct StatusRow {
    status: JobStatus,
    error: Option<String>,
    video_params: Option<String>,
}

/// Serves job progress to polling clients.
pub struct StatusRepo;

impl StatusRepo {
    /// Fetch the polling view of a job. Returns `None` when the job does
    /// not exist or is not owned by `owner` — this is a read authorization
    /// boundary, indistinguishable from absence on purpose.
    ///
    /// Precedence: for video jobs (non-null `video_params`) the nested
    /// `status`/`error` fields are authoritative once present; otherwise
    /// the top-level columns are. Edited slots are only hydrated for
    /// completed image jobs.
    pub async fn get_status(
        pool: &SqlitePool,
        id: &str,
        owner: &str,
    ) -> Result<Option<JobStatusView>, sqlx::Error> {
        let row = sqlx::query_as::<_, StatusRow>(
            "SELECT status, error, video_params FROM history WHERE id = ?1 AND owner = ?2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;
        let Some(row) = row else { return Ok(None) };

        let mut view = JobStatusView {
            status: row.status.as_str().to_string(),
            error: row.error,
            video_url: None,
            local_video_url: None,
            edited_urls: None,
        };

        match row.video_params.as_deref() {
            Some(raw) => {
                // Malformed nested JSON falls back to the top-level fields.
                let nested: serde_json::Value = match serde_json::from_str(raw) {
                    Ok(value) => value,
                    Err(err) => {
                        tracing::warn!(job_id = id, %err, "malformed video_params in status read");
                        return Ok(Some(view));
                    }
                };
                if let Some(status) = nested.get("status").and_then(|v| v.as_str()) {
                    view.status = status.to_string();
                }
                if let Some(error) = nested.get("error").and_then(|v| v.as_str()) {
                    view.error = Some(error.to_string());
                }
                view.video_url = nested
                    .get("videoUrl")
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                view.local_video_url = nested
                    .get("localVideoUrl")
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
            }
            None => {
                if row.status == JobStatus::Completed {
                    view.edited_urls =
                        Some(MediaSlotRepo::read_slots(pool, id, SlotType::Edited).await?);
                }
            }
        }

        Ok(Some(view))
    }
}
