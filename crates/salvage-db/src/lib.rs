//! # salvage-db: Database Layer for the Salvage Catalog
//!
//! SQLite storage for the catalog, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  CatalogService::browse (salvage-catalog)                              │
//! │       │  Predicate values built by salvage-core                        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    salvage-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CategoryRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ VendorRepo    │    │ 001_catalog_ │  │   │
//! │  │   │               │    │ ItemRepo      │    │   schema.sql │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                     sql.rs: Predicate → WHERE                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (salvage.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Category, vendor and item repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salvage_core::{compose, FilterCriteria};
//! use salvage_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("salvage.db")).await?;
//! let total = db.items().count(&compose(&FilterCriteria::default())).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::item::ItemRepository;
pub use repository::vendor::{generate_vendor_id, VendorRepository};
