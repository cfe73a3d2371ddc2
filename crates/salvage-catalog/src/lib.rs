//! # salvage-catalog: Catalog Request Orchestration
//!
//! Serves faceted catalog views of a salvage marketplace: the filtered item
//! page, its pagination figures, the counted category tree and the flat
//! facets, all from one filter state.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Request Flow                             │
//! │                                                                         │
//! │  "?category=hinges&sort=-price"                                        │
//! │       │ codec::decode (malformed values → defaults)                    │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      CatalogService::browse                      │  │
//! │  │                                                                  │  │
//! │  │   tokio::time::timeout( try_join!(                               │  │
//! │  │       list_categories, list_vendors,                             │  │
//! │  │       facets::dimension_counts × 3,                              │  │
//! │  │       executor::fetch_page ) )                                   │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  SqliteSource  │  │  MemorySource  │  │  any dyn CatalogSource │    │
//! │  │  (salvage-db)  │  │  (tests/demo)  │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  CatalogPage { items, totalCount, totalPages, categoryTree,            │
//! │                sidebar, facets, activeFilters, chips }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`service`] - `CatalogService` and the `CatalogPage` payload
//! - [`source`] - `CatalogSource` trait and the SQLite implementation
//! - [`memory`] - In-process source with latency/failure injection
//! - [`executor`] - Paginated page + total fetch
//! - [`facets`] - Facet count aggregation
//! - [`config`] - TOML/env configuration
//! - [`logging`] - Subscriber setup for binaries
//! - [`error`] - Catalog error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use salvage_catalog::{CatalogConfig, CatalogService, SqliteSource};
//! use salvage_db::Database;
//!
//! let config = CatalogConfig::load_or_default(None);
//! let db = Database::new(config.db_config()).await?;
//! let service = CatalogService::new(Arc::new(SqliteSource::new(db)), config.catalog);
//!
//! let page = service.browse_query("category=doors&classification=antique").await?;
//! println!("{} items over {} pages", page.total_count(), page.total_pages());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod executor;
pub mod facets;
pub mod logging;
pub mod memory;
pub mod service;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CatalogConfig, CatalogSettings};
pub use error::{CatalogError, CatalogResult};
pub use executor::ItemPage;
pub use memory::{MemorySource, SourceOp};
pub use service::{CatalogPage, CatalogService};
pub use source::{CatalogSource, SqliteSource};
