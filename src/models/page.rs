//! Page metadata and slicing for independently paginated listings.

use serde::Serialize;

/// Hard upper bound on `itemsPerPage` accepted from a caller.
pub const ITEMS_PER_PAGE_CAP: usize = 50;

/// Page size used when the caller does not send one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Metadata describing one page of a sorted list.
///
/// A listing response carries two independent instances: one for folders,
/// one for files.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number that was requested.
    pub current_page: usize,

    /// Total number of pages; 0 when the list is empty.
    pub total_pages: usize,

    /// Total number of items across all pages.
    pub total_items: usize,

    /// Page size the totals were computed against.
    pub items_per_page: usize,

    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    /// Compute page metadata for a list of `total_items` entries.
    ///
    /// `items_per_page` must already be validated to `1..=ITEMS_PER_PAGE_CAP`.
    pub fn new(current_page: usize, items_per_page: usize, total_items: usize) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            total_items.div_ceil(items_per_page)
        };
        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

/// Slice one 1-based page out of a fully sorted list.
///
/// Requesting a page past the end yields an empty slice, not an error.
pub fn paginate<T>(items: Vec<T>, page: usize, items_per_page: usize) -> (Vec<T>, PageInfo) {
    let info = PageInfo::new(page, items_per_page, items.len());
    let start = page.saturating_sub(1).saturating_mul(items_per_page);
    let page_items = if start >= items.len() {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(items_per_page).collect()
    };
    (page_items, info)
}
