//! Pagination request/response types.

use serde::{Deserialize, Serialize};

/// Default page when the query omits it or sends garbage.
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size when the query omits it or sends garbage.
pub const DEFAULT_LIMIT: u64 = 10;

/// Upper bound applied to `limit`.
pub const MAX_LIMIT: u64 = 100;

/// Upper bound applied to `page`: the largest page whose offset still fits a
/// signed 64-bit SQL `OFFSET` at the maximum limit.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT + 1;

/// Pagination parameters for list endpoints.
///
/// - `page`: ≥ 1, default 1
/// - `limit`: 1–100, default 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build from raw query-string values.
    ///
    /// Absent, unparsable, zero or negative values fall back to the defaults
    /// rather than failing the request.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
        .clamped()
    }

    /// Clamp `limit` to 1–100 and `page` to 1–[`MAX_PAGE`].
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.clamp(1, MAX_PAGE),
            limit: self.limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        let offset = (self.page.clamp(1, MAX_PAGE) - 1).saturating_mul(self.limit);
        offset.min(i64::MAX as u64)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v as u64)
}

/// Pagination block returned alongside a page of items.
///
/// `nextPage`/`prevPage` serialize as explicit `null` when there is no such page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let PageRequest { page, limit } = request.clamped();
        let total_pages = total_items.div_ceil(limit);
        let has_next_page = page < total_pages;
        let has_prev_page = page > 1;
        Self {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| page + 1),
            prev_page: has_prev_page.then(|| page - 1),
        }
    }
}
