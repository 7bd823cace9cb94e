//! Page window arithmetic

use serde::Deserialize;
use serde::Serialize;

/// 1-based inclusive record range for "showing X-Y of Z".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRange {
    pub start: usize,
    pub end: usize,
}

/// Rows of page `page` (1-based). `None` or zero `rows_per_page` means no
/// paging: every row is returned.
pub fn paginate<R: Clone>(rows: &[R], page: usize, rows_per_page: Option<usize>) -> Vec<R> {
    match rows_per_page.filter(|n| *n > 0) {
        None => rows.to_vec(),
        Some(n) => {
            let start = page.saturating_sub(1).saturating_mul(n).min(rows.len());
            let end = start.saturating_add(n).min(rows.len());
            rows[start..end].to_vec()
        }
    }
}

/// Display range of `page`. `end` is clamped to `total`.
pub fn record_range(page: usize, rows_per_page: Option<usize>, total: usize) -> RecordRange {
    match rows_per_page.filter(|n| *n > 0) {
        None => RecordRange {
            start: 1,
            end: total,
        },
        Some(n) => {
            let page = page.max(1);
            RecordRange {
                start: (page - 1).saturating_mul(n).saturating_add(1),
                end: page.saturating_mul(n).min(total),
            }
        }
    }
}

/// Number of pages needed for `total` rows. Unpaged tables have one page.
pub fn total_pages(total: usize, rows_per_page: Option<usize>) -> usize {
    match rows_per_page.filter(|n| *n > 0) {
        None => 1,
        Some(n) => total.div_ceil(n),
    }
}

/// Page to show after the page size changed: within `1..=total_pages`.
pub fn reclamp_page(page: usize, total: usize, rows_per_page: Option<usize>) -> usize {
    let pages = total_pages(total, rows_per_page);
    if page > pages {
        pages.max(1)
    } else {
        page.max(1)
    }
}
