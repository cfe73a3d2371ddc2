//! # Filter State
//!
//! The normalized, immutable description of one catalog request.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  query string ──► codec::decode ──► FilterState ──► criteria()         │
//! │                                          │               │              │
//! │                                          │               ▼              │
//! │                              with_*(..)  │        FilterCriteria        │
//! │                       (user action, new  │        ├── full      → items │
//! │                        value, page reset)│        └── without_* → facets│
//! │                                          ▼                              │
//! │                              codec::encode ──► query string             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `all` sentinel never appears here: an unconstrained dimension is
//! `None`. Fields are private so every state is normalized (trimmed search,
//! page ≥ 1, listed page size).

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::pagination::PageSize;
use crate::sort::SortKey;
use crate::types::{Classification, VendorId};
use crate::validation::{normalize_dimension, normalize_search};

// =============================================================================
// View Mode
// =============================================================================

/// Listing layout. Affects presentation only, never the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            _ => Err(ValidationError::not_allowed("view", &["grid", "list"])),
        }
    }
}

// =============================================================================
// Filter Criteria
// =============================================================================

/// The narrowing dimensions of a request: what the compositor sees.
///
/// Pagination, sort and view are not criteria; they never change which
/// items match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Category slug; matches the category itself or any of its children.
    pub category: Option<String>,
    pub classification: Option<Classification>,
    pub vendor: Option<VendorId>,
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Criteria for the category facet: every filter except category.
    pub fn without_category(&self) -> FilterCriteria {
        FilterCriteria {
            category: None,
            ..self.clone()
        }
    }

    /// Criteria for the classification facet.
    pub fn without_classification(&self) -> FilterCriteria {
        FilterCriteria {
            classification: None,
            ..self.clone()
        }
    }

    /// Criteria for the vendor facet.
    pub fn without_vendor(&self) -> FilterCriteria {
        FilterCriteria {
            vendor: None,
            ..self.clone()
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none()
            && self.classification.is_none()
            && self.vendor.is_none()
            && self.search.is_none()
    }
}

// =============================================================================
// Filter State
// =============================================================================

/// Complete, normalized filter state of one request.
///
/// Each `with_*` method returns a new state with one field changed. Changing
/// a narrowing dimension (category, classification, vendor, search) or the
/// page size sends the user back to page 1.
///
/// ```rust
/// use salvage_core::filter::FilterState;
///
/// let state = FilterState::default().with_page(4).with_search("oak door");
/// assert_eq!(state.page(), 1);
/// assert_eq!(state.search(), Some("oak door"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    category: Option<String>,
    classification: Option<Classification>,
    vendor: Option<VendorId>,
    search: Option<String>,
    page: Page,
    limit: PageSize,
    sort: SortKey,
    view: ViewMode,
}

/// 1-based page number, defaulting to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
struct Page(u32);

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl FilterState {
    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    pub fn vendor(&self) -> Option<&VendorId> {
        self.vendor.as_ref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page.0
    }

    pub fn limit(&self) -> PageSize {
        self.limit
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// The narrowing part of this state.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            category: self.category.clone(),
            classification: self.classification,
            vendor: self.vendor.clone(),
            search: self.search.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Derivations
    // -------------------------------------------------------------------------

    /// Sets or clears the category slug. `"all"` and `""` clear it.
    pub fn with_category(self, slug: Option<&str>) -> Self {
        FilterState {
            category: slug.and_then(normalize_dimension),
            page: Page::default(),
            ..self
        }
    }

    pub fn with_classification(self, classification: Option<Classification>) -> Self {
        FilterState {
            classification,
            page: Page::default(),
            ..self
        }
    }

    /// Sets or clears the vendor. A blank or `"all"` vendor id clears it.
    pub fn with_vendor(self, vendor: Option<VendorId>) -> Self {
        let vendor = vendor
            .and_then(|v| normalize_dimension(v.as_str()))
            .map(VendorId::from);
        FilterState {
            vendor,
            page: Page::default(),
            ..self
        }
    }

    /// Sets the search text; blank text clears it.
    pub fn with_search(self, search: &str) -> Self {
        FilterState {
            search: normalize_search(search),
            page: Page::default(),
            ..self
        }
    }

    /// Moves to `page`; 0 is treated as 1.
    pub fn with_page(self, page: u32) -> Self {
        FilterState {
            page: Page(page.max(1)),
            ..self
        }
    }

    pub fn with_limit(self, limit: PageSize) -> Self {
        FilterState {
            limit,
            page: Page::default(),
            ..self
        }
    }

    pub fn with_sort(self, sort: SortKey) -> Self {
        FilterState { sort, ..self }
    }

    pub fn with_view(self, view: ViewMode) -> Self {
        FilterState { view, ..self }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortField;
    use pretty_assertions::assert_eq;

    fn on_page_three() -> FilterState {
        FilterState::default()
            .with_category(Some("hardware"))
            .with_search("brass")
            .with_page(3)
    }

    #[test]
    fn test_defaults() {
        let state = FilterState::default();
        assert_eq!(state.page(), 1);
        assert_eq!(state.limit().get(), 25);
        assert_eq!(state.sort().to_string(), "-createdAt");
        assert_eq!(state.view(), ViewMode::Grid);
        assert!(state.criteria().is_unconstrained());
    }

    #[test]
    fn test_narrowing_changes_reset_page() {
        assert_eq!(on_page_three().with_category(Some("doors")).page(), 1);
        assert_eq!(
            on_page_three().with_classification(Some(Classification::Modern)).page(),
            1
        );
        assert_eq!(on_page_three().with_vendor(Some(VendorId::from("7"))).page(), 1);
        assert_eq!(on_page_three().with_search("latch").page(), 1);
        assert_eq!(on_page_three().with_limit(PageSize::new(50).unwrap()).page(), 1);
    }

    #[test]
    fn test_sort_and_view_keep_page() {
        let state = on_page_three()
            .with_sort(SortKey::asc(SortField::Price))
            .with_view(ViewMode::List);
        assert_eq!(state.page(), 3);
        assert_eq!(state.category(), Some("hardware"));
        assert_eq!(state.search(), Some("brass"));
    }

    #[test]
    fn test_sentinel_and_blank_clear_dimension() {
        let state = on_page_three().with_category(Some("all"));
        assert_eq!(state.category(), None);
        let state = on_page_three().with_vendor(Some(VendorId::from(" ")));
        assert_eq!(state.vendor(), None);
        let state = on_page_three().with_search("   ");
        assert_eq!(state.search(), None);
    }

    #[test]
    fn test_without_helpers_drop_one_dimension() {
        let criteria = FilterState::default()
            .with_category(Some("hinges"))
            .with_classification(Some(Classification::Antique))
            .with_vendor(Some(VendorId::from("3")))
            .criteria();

        assert_eq!(criteria.without_category().category, None);
        assert_eq!(criteria.without_category().vendor, Some(VendorId::from("3")));
        assert_eq!(criteria.without_classification().classification, None);
        assert_eq!(criteria.without_vendor().vendor, None);
        assert_eq!(criteria.without_vendor().category.as_deref(), Some("hinges"));
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!("LIST".parse::<ViewMode>().unwrap(), ViewMode::List);
        assert!("table".parse::<ViewMode>().is_err());
    }
}
