//! This module defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The expenses to return per page when not specified in a request.
    pub default_page_size: u64,
    /// The unpaid expenses to return per page when not specified in a
    /// request. The upcoming-expenses view shows far fewer rows than the
    /// main list.
    pub unpaid_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 15,
            unpaid_page_size: 5,
        }
    }
}

/// The page/limit query parameters accepted by the expense list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// How many items to return per page.
    pub limit: Option<u64>,
}

/// One page of items plus the arithmetic clients need for paging controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The 1-based page number that was served.
    pub page: u64,
    /// The page size that was applied.
    pub limit: u64,
    /// How many items exist across all pages.
    pub total: u64,
    /// How many pages exist at this page size.
    pub total_pages: u64,
}

/// Slice `items` down to the requested page.
///
/// Pages are 1-based; page zero is treated as page one and a zero limit
/// falls back to one item per page.
pub fn paginate<T>(items: Vec<T>, page: u64, limit: u64) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len() as u64;
    let total_pages = total.div_ceil(limit);

    let skip = (page - 1).saturating_mul(limit);
    let items = items
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();

    Page {
        items,
        page,
        limit,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod pagination_tests {
    use super::paginate;

    #[test]
    fn serves_the_first_page() {
        let got = paginate((1..=7).collect(), 1, 3);

        assert_eq!(got.items, [1, 2, 3]);
        assert_eq!(got.page, 1);
        assert_eq!(got.limit, 3);
        assert_eq!(got.total, 7);
        assert_eq!(got.total_pages, 3);
    }

    #[test]
    fn serves_a_short_final_page() {
        let got = paginate((1..=7).collect(), 3, 3);

        assert_eq!(got.items, [7]);
        assert_eq!(got.total_pages, 3);
    }

    #[test]
    fn serves_an_empty_page_past_the_end() {
        let got = paginate((1..=7).collect::<Vec<_>>(), 4, 3);

        assert!(got.items.is_empty());
        assert_eq!(got.total, 7);
    }

    #[test]
    fn clamps_page_zero_to_the_first_page() {
        let got = paginate((1..=7).collect(), 0, 3);

        assert_eq!(got.items, [1, 2, 3]);
        assert_eq!(got.page, 1);
    }

    #[test]
    fn an_empty_list_has_no_pages() {
        let got = paginate(Vec::<i32>::new(), 1, 3);

        assert!(got.items.is_empty());
        assert_eq!(got.total, 0);
        assert_eq!(got.total_pages, 0);
    }

    #[test]
    fn clamps_a_zero_limit() {
        let got = paginate((1..=3).collect(), 1, 0);

        assert_eq!(got.items, [1]);
        assert_eq!(got.limit, 1);
    }
}
