//! Media slot models: the positional-array view of the normalized
//! `history_media` rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Number of positional slots per slot type.
pub const SLOT_COUNT: usize = 4;

/// Fixed-length positional URL array. `None` marks an unused slot; a value
/// at index 2 with empty neighbours is legal and round-trips exactly.
pub type SlotArray = [Option<String>; SLOT_COUNT];

/// Logical grouping of a job's media slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    /// AI-edited output images.
    Edited,
    /// Source images kept for before/after comparison. Standalone-video
    /// jobs always store their source image here, never in `Edited`.
    OriginalForComparison,
    /// Generated video files.
    GeneratedVideo,
}

impl SlotType {
    pub const ALL: [SlotType; 3] = [
        SlotType::Edited,
        SlotType::OriginalForComparison,
        SlotType::GeneratedVideo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotType::Edited => "edited",
            SlotType::OriginalForComparison => "original_for_comparison",
            SlotType::GeneratedVideo => "generated_video",
        }
    }
}

/// A row from the `history_media` table.
#[derive(Debug, Clone, FromRow)]
pub struct MediaSlotRow {
    pub job_id: String,
    pub url: String,
    pub slot_type: SlotType,
    pub slot_index: i64,
}

/// All three slot arrays of a single job.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobMedia {
    pub edited: SlotArray,
    pub original: SlotArray,
    pub video: SlotArray,
}

impl JobMedia {
    /// Fold normalized rows into positional arrays. Rows with an index
    /// outside `0..SLOT_COUNT` cannot exist under the schema CHECK but are
    /// skipped defensively on the read path.
    pub fn from_rows(rows: &[MediaSlotRow]) -> Self {
        let mut media = JobMedia::default();
        for row in rows {
            let Ok(index) = usize::try_from(row.slot_index) else {
                continue;
            };
            if index >= SLOT_COUNT {
                continue;
            }
            let array = match row.slot_type {
                SlotType::Edited => &mut media.edited,
                SlotType::OriginalForComparison => &mut media.original,
                SlotType::GeneratedVideo => &mut media.video,
            };
            array[index] = Some(row.url.clone());
        }
        media
    }

    pub fn slots(&self, slot_type: SlotType) -> &SlotArray {
        match slot_type {
            SlotType::Edited => &self.edited,
            SlotType::OriginalForComparison => &self.original,
            SlotType::GeneratedVideo => &self.video,
        }
    }
}
