//! Pagination state of a list screen.

use crate::record::PageMeta;
use serde::{Deserialize, Serialize};

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Zero-based pagination state plus the metadata the server returned for
/// the last applied page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// Current page index (zero-based)
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationState {
    pub fn new(page_size: u64) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            total: 0,
            total_pages: 0,
            has_next: false,
            has_prev: false,
        }
    }

    /// One-based page number as sent on the wire.
    pub fn wire_page(&self) -> u64 {
        self.page.saturating_add(1)
    }

    /// Copies server metadata into the state.
    pub fn apply_meta(&mut self, meta: &PageMeta) {
        self.total = meta.total;
        self.total_pages = meta.total_pages;
        self.has_next = meta.has_next;
        self.has_prev = meta.has_prev;
    }

    /// Index of the last page that can hold records.
    pub fn last_valid_page(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            (self.total - 1) / self.page_size
        }
    }

    /// True when the current page starts past the end of the result set.
    pub fn is_out_of_range(&self) -> bool {
        self.is_page_out_of_range(self.page)
    }

    /// True when page `index` starts past the end of the result set.
    pub fn is_page_out_of_range(&self, index: u64) -> bool {
        self.total > 0 && index.saturating_mul(self.page_size) >= self.total
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
