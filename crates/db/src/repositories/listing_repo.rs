//! Paginated, filtered, and searchable views over the history table.
//!
//! All variants share one count+offset query builder. The search term is
//! always a bound parameter with `LIKE` metacharacters escaped, never
//! interpolated into the SQL text.

use lookbook_core::search::{clamp_page, clamp_page_size, escape_like};
use sqlx::SqlitePool;

use crate::models::job::{Job, JobRow};
use crate::models::page::{HistoryFilter, Page};
use crate::repositories::MediaSlotRepo;

/// Column list for `history` queries.
const COLUMNS: &str = "\
    id, owner, created_at, prompt, source_media_url, settings_mode, \
    generation_model, attributes, video_params, status, error, callback_url";

/// Ordering for every listing: newest first, ties broken by insertion
/// order via rowid so pages are stable across requests.
const ORDERING: &str = "ORDER BY created_at DESC, rowid DESC";

/// Provides paginated history listings.
pub struct ListingRepo;

impl ListingRepo {
    /// List one owner's jobs, newest first, optionally filtered to image
    /// or video jobs.
    pub async fn list_for_owner(
        pool: &SqlitePool,
        owner: &str,
        page: i64,
        page_size: i64,
        filter: HistoryFilter,
    ) -> Result<Page<Job>, sqlx::Error> {
        Self::list(pool, Some(owner), None, filter, page, page_size).await
    }

    /// Cross-owner listing for the admin panel. Same pagination contract.
    pub async fn list_all(
        pool: &SqlitePool,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Job>, sqlx::Error> {
        Self::list(pool, None, None, HistoryFilter::All, page, page_size).await
    }

    /// Case-insensitive substring search over `prompt` and
    /// `source_media_url` within one owner's history. Wildcard characters
    /// in the term match literally.
    pub async fn search(
        pool: &SqlitePool,
        owner: &str,
        term: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Job>, sqlx::Error> {
        Self::list(
            pool,
            Some(owner),
            Some(term),
            HistoryFilter::All,
            page,
            page_size,
        )
        .await
    }

    /// Shared query builder behind every listing variant.
    async fn list(
        pool: &SqlitePool,
        owner: Option<&str>,
        term: Option<&str>,
        filter: HistoryFilter,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Job>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let offset = (page - 1) * page_size;

        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(owner) = owner {
            conditions.push("owner = ?");
            binds.push(owner.to_string());
        }
        if let Some(term) = term {
            let pattern = format!("%{}%", escape_like(term.trim()));
            conditions.push("(prompt LIKE ? ESCAPE '\\' OR source_media_url LIKE ? ESCAPE '\\')");
            binds.push(pattern.clone());
            binds.push(pattern);
        }
        if let Some(condition) = filter.condition() {
            conditions.push(condition);
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM history {where_clause}");
        let mut count = sqlx::query_as::<_, (i64,)>(&count_query);
        for bind in &binds {
            count = count.bind(bind);
        }
        let (total_count,) = count.fetch_one(pool).await?;

        let rows_query =
            format!("SELECT {COLUMNS} FROM history {where_clause} {ORDERING} LIMIT ? OFFSET ?");
        let mut rows = sqlx::query_as::<_, JobRow>(&rows_query);
        for bind in &binds {
            rows = rows.bind(bind);
        }
        let rows = rows.bind(page_size).bind(offset).fetch_all(pool).await?;

        // One batched slot query for the whole page.
        let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
        let mut media = MediaSlotRepo::read_for_jobs(pool, &ids).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let job_media = media.remove(&row.id).unwrap_or_default();
                row.into_job(job_media)
            })
            .collect();

        Ok(Page::new(items, total_count, page, page_size))
    }
}
