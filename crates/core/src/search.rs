//! Pagination clamps and search-term sanitation shared by listing queries.

/// Default page size for history listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for history listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a 1-based page number to at least 1.
pub fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

/// Clamp a page size into `1..=MAX_PAGE_SIZE`, substituting the default
/// for non-positive values.
pub fn clamp_page_size(page_size: i64) -> i64 {
    if page_size <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size.min(MAX_PAGE_SIZE)
    }
}

/// Escape `LIKE` metacharacters so a user-supplied search term matches
/// literally. Callers must pair the result with `ESCAPE '\'` in SQL.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamped_to_one() {
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(-5), 1);
        assert_eq!(clamp_page(3), 3);
    }

    #[test]
    fn page_size_clamped_to_bounds() {
        assert_eq!(clamp_page_size(0), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(-1), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(50), 50);
        assert_eq!(clamp_page_size(10_000), MAX_PAGE_SIZE);
    }

    #[test]
    fn like_metacharacters_escaped() {
        assert_eq!(escape_like("50% off_sale"), "50\\% off\\_sale");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
