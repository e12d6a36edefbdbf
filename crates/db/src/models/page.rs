//! Pagination envelope and listing filters.

use serde::{Deserialize, Serialize};

/// One page of a listing query.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub has_more: bool,
    pub current_page: i64,
}

impl<T> Page<T> {
    /// Build a page. `page` is 1-based and assumed already clamped.
    pub fn new(items: Vec<T>, total_count: i64, page: i64, page_size: i64) -> Self {
        let seen = (page - 1) * page_size + items.len() as i64;
        Page {
            items,
            total_count,
            has_more: seen < total_count,
            current_page: page,
        }
    }
}

/// Listing filter over job kind. A job is a video job iff its
/// `video_params` column is non-null; image is the complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    Image,
    Video,
}

impl HistoryFilter {
    /// WHERE fragment for this filter, if any. Static text only; never
    /// carries user input.
    pub fn condition(self) -> Option<&'static str> {
        match self {
            HistoryFilter::All => None,
            HistoryFilter::Image => Some("video_params IS NULL"),
            HistoryFilter::Video => Some("video_params IS NOT NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_accounts_for_prior_pages() {
        // 3 items total, page size 2: page 1 sees 2 of 3, page 2 the rest.
        let p1 = Page::new(vec![1, 2], 3, 1, 2);
        assert!(p1.has_more);
        let p2 = Page::new(vec![3], 3, 2, 2);
        assert!(!p2.has_more);
    }

    #[test]
    fn empty_result_has_no_more() {
        let p: Page<i32> = Page::new(vec![], 0, 1, 20);
        assert!(!p.has_more);
        assert_eq!(p.total_count, 0);
    }

    #[test]
    fn filter_conditions_partition_on_video_params() {
        assert!(HistoryFilter::All.condition().is_none());
        assert_eq!(
            HistoryFilter::Image.condition(),
            Some("video_params IS NULL")
        );
        assert_eq!(
            HistoryFilter::Video.condition(),
            Some("video_params IS NOT NULL")
        );
    }
}
