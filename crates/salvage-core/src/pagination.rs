//! # Pagination
//!
//! Page sizes come from a fixed set so that cached pages line up and a
//! hand-edited `limit=100000` cannot turn into a full table scan.
//!
//! ```text
//!   totalPages = max(1, ceil(totalCount / limit))
//!   offset     = (page - 1) * limit
//!   page > totalPages  →  empty page, never an error
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Page Size
// =============================================================================

/// A page size from the enumerated set {12, 25, 50, 100}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Accepted page sizes in display order.
    pub const ALLOWED: [u32; 4] = [12, 25, 50, 100];

    pub fn new(size: u32) -> Result<Self, ValidationError> {
        if Self::ALLOWED.contains(&size) {
            Ok(PageSize(size))
        } else {
            Err(ValidationError::not_allowed("limit", &["12", "25", "50", "100"]))
        }
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = ValidationError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        PageSize::new(size)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl FromStr for PageSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size = s.trim().parse::<u32>().map_err(|_| ValidationError::InvalidFormat {
            field: "limit".to_string(),
            reason: "not a number".to_string(),
        })?;
        PageSize::new(size)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Page Metadata
// =============================================================================

/// Pagination figures for one executed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageMeta {
    /// Requested page (1-based), even when beyond the last page.
    pub page: u32,
    pub limit: u32,
    #[ts(type = "number")]
    pub total_count: u64,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageMeta {
    pub fn new(total_count: u64, page: u32, limit: PageSize) -> Self {
        let page = page.max(1);
        let size = u64::from(limit.get());
        let pages = total_count.div_ceil(size).max(1);
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);

        PageMeta {
            page,
            limit: limit.get(),
            total_count,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// True when the page lies past the last page and must be empty.
    pub fn is_beyond_end(&self) -> bool {
        self.page > self.total_pages
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
