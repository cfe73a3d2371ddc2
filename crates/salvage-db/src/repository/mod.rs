//! # Repository Module
//!
//! Database repository implementations for the catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CatalogService / seed tool                                            │
//! │       │                                                                 │
//! │       │  db.items().count(&predicate)                                  │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── grouped_count(&self, predicate, group)   facet counts             │
//! │  ├── list_page(&self, predicate, sort, ...)   one page of items        │
//! │  ├── count(&self, predicate)                  total matching           │
//! │  └── insert / get_by_id / set_status / mark_sold                       │
//! │       │                                                                 │
//! │       │  sql::push_predicate ── same Predicate → same WHERE clause     │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category taxonomy
//! - [`VendorRepository`](vendor::VendorRepository) - Vendor directory
//! - [`ItemRepository`](item::ItemRepository) - Items, counts, pages

pub mod category;
pub mod item;
pub mod sql;
pub mod vendor;
