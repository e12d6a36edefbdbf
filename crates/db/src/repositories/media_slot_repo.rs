//! Repository for the `history_media` table.
//!
//! Encapsulates the positional-array <-> normalized-rows conversion. Writes
//! are deterministic replace-all per slot type so retried updates converge;
//! reads rebuild fixed-length arrays with gaps preserved as `None`.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::models::media::{JobMedia, MediaSlotRow, SlotArray, SlotType};

/// Column list for `history_media` queries.
const COLUMNS: &str = "job_id, url, slot_type, slot_index";

/// Provides slot-array storage for jobs.
pub struct MediaSlotRepo;

impl MediaSlotRepo {
    /// Replace all slots of one type for a job: delete existing rows, then
    /// insert the array's non-null entries at their positional index.
    ///
    /// Takes a connection so callers can compose it into a wider
    /// transaction; the delete and inserts are only atomic when they do.
    pub async fn write_slots(
        conn: &mut SqliteConnection,
        job_id: &str,
        slot_type: SlotType,
        urls: &SlotArray,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM history_media WHERE job_id = ?1 AND slot_type = ?2")
            .bind(job_id)
            .bind(slot_type)
            .execute(&mut *conn)
            .await?;

        for (index, url) in urls.iter().enumerate() {
            let Some(url) = url else { continue };
            sqlx::query(
                "INSERT INTO history_media (job_id, url, slot_type, slot_index) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(job_id)
            .bind(url)
            .bind(slot_type)
            .bind(index as i64)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Read one slot array, ordered by index, gaps rendered as `None`.
    pub async fn read_slots(
        pool: &SqlitePool,
        job_id: &str,
        slot_type: SlotType,
    ) -> Result<SlotArray, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history_media \
             WHERE job_id = ?1 AND slot_type = ?2 \
             ORDER BY slot_index"
        );
        let rows = sqlx::query_as::<_, MediaSlotRow>(&query)
            .bind(job_id)
            .bind(slot_type)
            .fetch_all(pool)
            .await?;
        Ok(JobMedia::from_rows(&rows).slots(slot_type).clone())
    }

    /// Read all three slot arrays of a job in one query.
    pub async fn read_all(pool: &SqlitePool, job_id: &str) -> Result<JobMedia, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history_media WHERE job_id = ?1 ORDER BY slot_index"
        );
        let rows = sqlx::query_as::<_, MediaSlotRow>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await?;
        Ok(JobMedia::from_rows(&rows))
    }

    /// Batched read for a page of jobs. One query regardless of page size;
    /// jobs without media rows get default (all-`None`) arrays.
    pub async fn read_for_jobs(
        pool: &SqlitePool,
        job_ids: &[String],
    ) -> Result<HashMap<String, JobMedia>, sqlx::Error> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; job_ids.len()].join(", ");
        let query = format!(
            "SELECT {COLUMNS} FROM history_media \
             WHERE job_id IN ({placeholders}) \
             ORDER BY slot_index"
        );
        let mut q = sqlx::query_as::<_, MediaSlotRow>(&query);
        for id in job_ids {
            q = q.bind(id);
        }
        let rows = q.fetch_all(pool).await?;

        let mut grouped: HashMap<String, Vec<MediaSlotRow>> = HashMap::new();
        for row in rows {
            grouped.entry(row.job_id.clone()).or_default().push(row);
        }
        Ok(grouped
            .into_iter()
            .map(|(job_id, rows)| {
                let media = JobMedia::from_rows(&rows);
                (job_id, media)
            })
            .collect())
    }
}
