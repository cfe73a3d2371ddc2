//! # salvage-core: Pure Catalog Logic
//!
//! Faceted filtering and category aggregation for a marketplace of one-off
//! salvage items. Everything here is a pure function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salvage Catalog                                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              salvage-catalog (service, CLI)                     │   │
//! │  │    browse ──► concurrent reads ──► CatalogPage                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salvage-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌──────────┐ ┌──────────────┐     │   │
//! │  │   │  codec   │ │ predicate │ │   tree   │ │ presentation │     │   │
//! │  │   │ query ⇄  │ │ compose   │ │ build +  │ │   sidebar    │     │   │
//! │  │   │ state    │ │ matches   │ │ counts   │ │   toggles    │     │   │
//! │  │   └──────────┘ └───────────┘ └──────────┘ └──────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  salvage-db (SQLite, sqlx)                      │   │
//! │  │          Predicate → SQL, repositories, migrations              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Items, categories, vendors, ids
//! - [`money`] - Integer money and the POA label
//! - [`filter`] - Normalized filter state and criteria
//! - [`predicate`] - Filter compositor and predicate evaluation
//! - [`tree`] - Category tree builder and facet roll-ups
//! - [`facet`] - Grouped-count contract and flat facet entries
//! - [`pagination`] - Page sizes and page metadata
//! - [`sort`] - Sort keys and the item ordering
//! - [`presentation`] - Sidebar view model
//! - [`codec`] - Query-string codec, filter changes, chips
//! - [`validation`] - Input normalization and record validation
//! - [`error`] - Validation errors
//!
//! ## Example Usage
//!
//! ```rust
//! use salvage_core::codec;
//! use salvage_core::predicate::compose;
//!
//! let state = codec::from_query_string("category=hardware&search=11&page=2");
//! assert_eq!(state.page(), 2);
//!
//! // Facets use every filter except category
//! let facet_predicate = compose(&state.criteria().without_category());
//! let item_predicate = compose(&state.criteria());
//! assert_ne!(facet_predicate, item_predicate);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod facet;
pub mod filter;
pub mod money;
pub mod pagination;
pub mod predicate;
pub mod presentation;
pub mod sort;
pub mod tree;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use facet::{FacetEntry, GroupCount, GroupField};
pub use filter::{FilterCriteria, FilterState, ViewMode};
pub use money::Money;
pub use pagination::{PageMeta, PageSize};
pub use predicate::{compose, CategoryLookup, Field, Predicate};
pub use sort::{SortDirection, SortField, SortKey};
pub use tree::CategoryTree;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Query-string value meaning "no constraint" for a dimension.
///
/// Only the codec and the normalizers know about it; inside the crate an
/// unconstrained dimension is `None`.
pub const SENTINEL_ALL: &str = "all";

/// Page size used when `limit` is missing or not in the allowed set.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Search text beyond this many characters is cut off.
pub const MAX_SEARCH_LEN: usize = 100;
