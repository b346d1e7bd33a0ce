//! Offset pagination for the event log endpoint.

use serde::{Deserialize, Serialize};

/// Default page size when `limit` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Query parameters accepted by `GET /events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    /// First sequence number to return.
    pub since: Option<u64>,
    /// Number of entries per page (default 100, max 1000).
    pub limit: Option<u32>,
}

impl EventsQuery {
    /// Effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn start(&self) -> u64 {
        self.since.unwrap_or(0)
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    /// Value to pass as `since` for the next page, or `None` on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
}

/// A short page means the end of the log was reached.
pub fn next_since(start: u64, returned: usize, page_size: u32) -> Option<u64> {
    if (returned as u64) < u64::from(page_size) {
        None
    } else {
        start.checked_add(returned as u64)
    }
}
