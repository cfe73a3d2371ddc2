//! # Catalog Data Source
//!
//! The five reads a catalog request needs. Every item read takes the same
//! [`Predicate`] value, so counts and pages can never disagree about what
//! matches.
//!
//! ```text
//! ┌───────────────────────┐        ┌─────────────────────────────────┐
//! │    CatalogService     │        │   dyn CatalogSource             │
//! │                       │ ─────► │                                 │
//! │  compose(criteria)    │        │  SqliteSource  → salvage-db     │
//! │                       │        │  MemorySource  → in process     │
//! └───────────────────────┘        └─────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

use salvage_core::{Category, GroupCount, GroupField, Item, PageSize, Predicate, SortKey, Vendor};
use salvage_db::Database;

use crate::error::CatalogResult;

/// Read access to categories, vendors and items.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every category, including empty ones, in taxonomy order.
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;

    async fn list_vendors(&self) -> CatalogResult<Vec<Vendor>>;

    /// Number of matching items per value of `group`.
    async fn grouped_count(
        &self,
        predicate: &Predicate,
        group: GroupField,
    ) -> CatalogResult<Vec<GroupCount>>;

    /// One page (1-based) of matching items in `sort` order.
    async fn list_items(
        &self,
        predicate: &Predicate,
        sort: &SortKey,
        page: u32,
        limit: PageSize,
    ) -> CatalogResult<Vec<Item>>;

    async fn count_items(&self, predicate: &Predicate) -> CatalogResult<u64>;
}

// =============================================================================
// SQLite Source
// =============================================================================

/// [`CatalogSource`] backed by the SQLite repositories.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    db: Database,
}

impl SqliteSource {
    pub fn new(db: Database) -> Self {
        SqliteSource { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CatalogSource for SqliteSource {
    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let start = Instant::now();
        let categories = self.db.categories().list().await?;
        debug!(
            count = categories.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched categories"
        );
        Ok(categories)
    }

    async fn list_vendors(&self) -> CatalogResult<Vec<Vendor>> {
        Ok(self.db.vendors().list().await?)
    }

    async fn grouped_count(
        &self,
        predicate: &Predicate,
        group: GroupField,
    ) -> CatalogResult<Vec<GroupCount>> {
        Ok(self.db.items().grouped_count(predicate, group).await?)
    }

    async fn list_items(
        &self,
        predicate: &Predicate,
        sort: &SortKey,
        page: u32,
        limit: PageSize,
    ) -> CatalogResult<Vec<Item>> {
        Ok(self.db.items().list_page(predicate, sort, page, limit).await?)
    }

    async fn count_items(&self, predicate: &Predicate) -> CatalogResult<u64> {
        Ok(self.db.items().count(predicate).await?)
    }
}
