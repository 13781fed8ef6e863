//! Pagination envelope shared by every listing endpoint.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by paginated listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; defaults to the first page.
    pub page: Option<u32>,
    /// Requested page size; clamped to the configured maximum.
    pub page_size: Option<u32>,
}

/// Cursor information attached to a page of results.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_items: u32,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// Slice `items` down to the requested page, reporting neighbours.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> (Vec<T>, PageInfo) {
    let page = page.max(1);
    let total_items = items.len() as u32;
    let start = (page - 1).saturating_mul(page_size) as usize;
    let end = start.saturating_add(page_size as usize).min(items.len());

    let window = if start >= items.len() {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(end - start).collect()
    };

    let info = PageInfo {
        page,
        page_size,
        total_items,
        has_next: (end as u32) < total_items,
        has_prev: page > 1,
    };

    (window, info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_three_items_with_limit_two() {
        let (window, info) = paginate(vec![1, 2, 3], 1, 2);
        assert_eq!(window, vec![1, 2]);
        assert!(info.has_next);
        assert!(!info.has_prev);
        assert_eq!(info.total_items, 3);
    }

    #[test]
    fn last_partial_page() {
        let (window, info) = paginate(vec![1, 2, 3], 2, 2);
        assert_eq!(window, vec![3]);
        assert!(!info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let (window, info) = paginate(vec![1, 2, 3], 9, 2);
        assert!(window.is_empty());
        assert!(!info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn zero_page_is_treated_as_first() {
        let (window, _info) = paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(window, vec![1, 2]);
    }
}
