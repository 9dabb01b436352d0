//! Page arithmetic.
//!
//! Pages are 1-based. An empty result set still has one (empty) page, so the
//! valid range is always `1..=total_pages` with `total_pages >= 1`.

use std::ops::Range;

use serde::Serialize;

/// Number of pages needed for `total` rows, never less than one.
pub fn total_pages(total: usize, rows_per_page: usize) -> usize {
    if rows_per_page == 0 {
        return 1;
    }
    total.div_ceil(rows_per_page).max(1)
}

/// Clamps `page` into `1..=total_pages(total, rows_per_page)`.
///
/// Idempotent: clamping an already valid page returns it unchanged.
pub fn clamp_page(page: usize, total: usize, rows_per_page: usize) -> usize {
    page.clamp(1, total_pages(total, rows_per_page))
}

/// Index range of `page` within a result set of `total` rows.
pub fn page_range(page: usize, total: usize, rows_per_page: usize) -> Range<usize> {
    let page = clamp_page(page, total, rows_per_page);
    let start = ((page - 1) * rows_per_page).min(total);
    let end = (start + rows_per_page).min(total);
    start..end
}

/// Pagination metadata for one rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub rows_per_page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    /// 1-based index of the first row shown, 0 when the page is empty.
    pub first_row: usize,
    /// 1-based index of the last row shown, 0 when the page is empty.
    pub last_row: usize,
}

impl PageInfo {
    pub fn new(page: usize, total: usize, rows_per_page: usize) -> Self {
        let range = page_range(page, total, rows_per_page);
        let (first_row, last_row) = if range.is_empty() {
            (0, 0)
        } else {
            (range.start + 1, range.end)
        };
        PageInfo {
            page: clamp_page(page, total, rows_per_page),
            rows_per_page,
            total_pages: total_pages(total, rows_per_page),
            total_rows: total,
            first_row,
            last_row,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl std::fmt::Display for PageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{} of {} (page {}/{})",
            self.first_row, self.last_row, self.total_rows, self.page, self.total_pages
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 20), 5);
    }

    #[test]
    fn clamp_to_last_page() {
        assert_eq!(clamp_page(9, 25, 10), 3);
        assert_eq!(clamp_page(0, 25, 10), 1);
        assert_eq!(clamp_page(2, 25, 10), 2);
        assert_eq!(clamp_page(4, 0, 10), 1);
    }

    #[test]
    fn range_of_last_partial_page() {
        assert_eq!(page_range(3, 25, 10), 20..25);
        assert_eq!(page_range(1, 0, 10), 0..0);
        assert_eq!(page_range(99, 25, 10), 20..25);
    }

    #[test]
    fn info_display() {
        let info = PageInfo::new(2, 25, 10);
        assert_eq!(info.to_string(), "11-20 of 25 (page 2/3)");
        assert!(info.has_prev());
        assert!(info.has_next());

        let empty = PageInfo::new(1, 0, 10);
        assert_eq!(empty.to_string(), "0-0 of 0 (page 1/1)");
        assert!(!empty.has_prev());
        assert!(!empty.has_next());
    }
}
