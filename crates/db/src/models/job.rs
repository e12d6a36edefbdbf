//! Job entity models and DTOs for the generation history store.

use lookbook_core::types::{JobId, TimestampMs};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::media::{JobMedia, SlotArray};

/// Lifecycle status of a generation job.
///
/// Monotonic: once `Completed` or `Failed`, a job never reverts to
/// `Processing`. The guard lives in the repository's UPDATE statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A raw row from the `history` table. JSON columns stay as text here;
/// hydration into [`Job`] parses them leniently.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: JobId,
    pub owner: String,
    pub created_at: TimestampMs,
    pub prompt: String,
    pub source_media_url: Option<String>,
    pub settings_mode: Option<String>,
    pub generation_model: Option<String>,
    pub attributes: String,
    pub video_params: Option<String>,
    pub status: JobStatus,
    pub error: Option<String>,
    pub callback_url: Option<String>,
}

impl JobRow {
    /// Hydrate the row into the public entity. A corrupted JSON column
    /// degrades to its empty default so historical rows stay browsable.
    pub fn into_job(self, media: JobMedia) -> Job {
        let attributes = parse_object_lenient(&self.attributes, "attributes", &self.id)
            .unwrap_or_else(empty_object);
        let video_params = self
            .video_params
            .as_deref()
            .and_then(|raw| parse_object_lenient(raw, "video_params", &self.id));
        Job {
            id: self.id,
            owner: self.owner,
            created_at: self.created_at,
            prompt: self.prompt,
            source_media_url: self.source_media_url,
            settings_mode: self.settings_mode,
            generation_model: self.generation_model,
            attributes,
            video_params,
            status: self.status,
            error: self.error,
            callback_url: self.callback_url,
            edited_urls: media.edited,
            original_urls: media.original,
            video_urls: media.video,
        }
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Parse a persisted JSON column, returning `None` (and a warning) on
/// malformed content. Reads must never fail because of a bad old write.
fn parse_object_lenient(raw: &str, column: &str, job_id: &str) -> Option<serde_json::Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(job_id, column, %err, "malformed JSON column, using default");
            None
        }
    }
}

/// A fully hydrated generation job: the `history` row plus its three
/// positional media arrays.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub owner: String,
    pub created_at: TimestampMs,
    pub prompt: String,
    pub source_media_url: Option<String>,
    pub settings_mode: Option<String>,
    pub generation_model: Option<String>,
    /// Opaque generation parameters. Merge-patched, never interpreted.
    pub attributes: serde_json::Value,
    /// Present iff this is a video job.
    pub video_params: Option<serde_json::Value>,
    pub status: JobStatus,
    pub error: Option<String>,
    pub callback_url: Option<String>,
    pub edited_urls: SlotArray,
    pub original_urls: SlotArray,
    pub video_urls: SlotArray,
}

impl Job {
    /// Classification rule for listing filters.
    pub fn is_video(&self) -> bool {
        self.video_params.is_some()
    }
}

/// DTO for accepting a new generation job. Status is always `processing`
/// at insert; the worker flips it via [`UpdateJob`] later.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateJob {
    /// Caller-supplied id; a UUID v4 is generated when absent.
    pub id: Option<JobId>,
    pub owner: String,
    /// Defaults to now.
    pub created_at: Option<TimestampMs>,
    #[serde(default)]
    pub prompt: String,
    pub source_media_url: Option<String>,
    pub settings_mode: Option<String>,
    pub generation_model: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub video_params: Option<serde_json::Value>,
    pub callback_url: Option<String>,
    #[serde(default)]
    pub edited_urls: SlotArray,
    #[serde(default)]
    pub original_urls: SlotArray,
    #[serde(default)]
    pub video_urls: SlotArray,
}

/// Partial update for a job. Only non-`None` fields are applied, in one
/// transaction. `attributes` / `video_params` are JSON-merge-patched by the
/// engine; slot arrays are replaced wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJob {
    pub prompt: Option<String>,
    pub settings_mode: Option<String>,
    pub status: Option<JobStatus>,
    pub error: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub video_params: Option<serde_json::Value>,
    pub edited_urls: Option<SlotArray>,
    pub original_urls: Option<SlotArray>,
    pub video_urls: Option<SlotArray>,
}

/// Polling view served by the status bridge. Deliberately thin: no full
/// media hydration beyond what a poller renders.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusView {
    /// Top-level job status, or the nested video-generation status when
    /// `video_params` is present (the nested object is authoritative for
    /// video jobs once generation begins).
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_urls: Option<SlotArray>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::JobMedia;

    fn row(attributes: &str, video_params: Option<&str>) -> JobRow {
        JobRow {
            id: "j1".to_string(),
            owner: "alice".to_string(),
            created_at: 100,
            prompt: "red dress".to_string(),
            source_media_url: None,
            settings_mode: None,
            generation_model: None,
            attributes: attributes.to_string(),
            video_params: video_params.map(str::to_string),
            status: JobStatus::Processing,
            error: None,
            callback_url: None,
        }
    }

    #[test]
    fn corrupted_attributes_degrade_to_empty_object() {
        let job = row("{not json", None).into_job(JobMedia::default());
        assert_eq!(job.attributes, serde_json::json!({}));
    }

    #[test]
    fn corrupted_video_params_degrade_to_none() {
        let job = row("{}", Some("[broken")).into_job(JobMedia::default());
        assert!(job.video_params.is_none());
        assert!(!job.is_video());
    }

    #[test]
    fn video_classification_follows_video_params() {
        let job = row("{}", Some(r#"{"mode":"standalone"}"#)).into_job(JobMedia::default());
        assert!(job.is_video());
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }
}
