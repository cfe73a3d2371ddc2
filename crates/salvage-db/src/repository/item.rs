//! # Item Repository
//!
//! Writes for the item lifecycle, and the three predicate-driven reads the
//! catalog is built from.
//!
//! ## One Predicate, Three Reads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compose(criteria without category) ──► grouped_count(.., CategoryId)   │
//! │                                          └─► facet counts per category  │
//! │                                                                         │
//! │  compose(criteria) ──┬──► list_page(.., sort, page, limit)             │
//! │                      │    └─► items on this page                       │
//! │                      └──► count(..)                                    │
//! │                           └─► totalMatching                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! All three go through [`sql::push_where`], so a predicate means the same
//! thing in every query.
//!
//! ## Unique Items
//! An item sells once. [`ItemRepository::mark_sold`] only moves
//! `available → sold`; there is no way back and no stock count.

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::time::Instant;
use tracing::debug;

use super::sql;
use crate::error::{DbError, DbResult};
use salvage_core::validation::{validate_name, validate_price};
use salvage_core::{GroupCount, GroupField, Item, ItemId, ItemStatus, PageSize, Predicate, SortKey};

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct GroupRow {
    group_value: Option<String>,
    count: i64,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Inserts a new item.
    ///
    /// ## Returns
    /// * `Err(DbError::Invalid)` - blank name or negative price
    /// * `Err(DbError::UniqueViolation)` - id already used
    /// * `Err(DbError::ForeignKeyViolation)` - unknown vendor or category
    pub async fn insert(&self, item: &Item) -> DbResult<Item> {
        validate_name("name", &item.name)?;
        validate_price(item.price_minor)?;

        debug!(id = %item.id, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, price_minor, status, availability, classification,
                category_id, vendor_id, thumbnail, featured, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.price_minor)
        .bind(item.status)
        .bind(item.availability)
        .bind(item.classification)
        .bind(&item.category_id)
        .bind(&item.vendor_id)
        .bind(&item.thumbnail)
        .bind(item.featured)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item.clone())
    }

    pub async fn get_by_id(&self, id: &ItemId) -> DbResult<Option<Item>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(sql::ITEM_COLUMNS)
            .push(sql::ITEM_SOURCE)
            .push(" WHERE i.id = ")
            .push_bind(id.as_str().to_string());

        let item = qb.build_query_as::<Item>().fetch_optional(&self.pool).await?;
        Ok(item)
    }

    /// Publishes or unpublishes an item.
    pub async fn set_status(&self, id: &ItemId, status: ItemStatus) -> DbResult<()> {
        debug!(id = %id, status = status.as_str(), "Setting item status");

        let result = sqlx::query("UPDATE items SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id.as_str()));
        }

        Ok(())
    }

    /// Records the sale of an item.
    ///
    /// ## Returns
    /// * `Ok(true)` - the item was available and is now sold
    /// * `Ok(false)` - the item had already sold
    /// * `Err(DbError::NotFound)` - no such item
    pub async fn mark_sold(&self, id: &ItemId) -> DbResult<bool> {
        debug!(id = %id, "Marking item sold");

        let result = sqlx::query(
            r#"
            UPDATE items
            SET availability = 'sold', updated_at = ?2
            WHERE id = ?1 AND availability = 'available'
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if exists == 0 {
            Err(DbError::not_found("Item", id.as_str()))
        } else {
            Ok(false)
        }
    }

    // -------------------------------------------------------------------------
    // Catalog Reads
    // -------------------------------------------------------------------------

    /// Counts items matching `predicate`.
    pub async fn count(&self, predicate: &Predicate) -> DbResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
        qb.push(sql::ITEM_SOURCE);
        sql::push_where(&mut qb, predicate);

        let count: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Counts items matching `predicate`, grouped by one column.
    ///
    /// Items with no value in the column form one group with
    /// `group_value: None`.
    pub async fn grouped_count(
        &self,
        predicate: &Predicate,
        group: GroupField,
    ) -> DbResult<Vec<GroupCount>> {
        let started = Instant::now();
        let column = sql::group_column(group);

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(column)
            .push(" AS group_value, COUNT(*) AS count")
            .push(sql::ITEM_SOURCE);
        sql::push_where(&mut qb, predicate);
        qb.push(" GROUP BY ").push(column).push(" ORDER BY ").push(column);

        let rows: Vec<GroupRow> = qb.build_query_as::<GroupRow>().fetch_all(&self.pool).await?;

        debug!(
            group = ?group,
            groups = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Grouped count"
        );

        Ok(rows
            .into_iter()
            .map(|row| GroupCount {
                group_value: row.group_value,
                count: u64::try_from(row.count).unwrap_or(0),
            })
            .collect())
    }

    /// Fetches one page of items matching `predicate`.
    ///
    /// A page past the end returns an empty list.
    pub async fn list_page(
        &self,
        predicate: &Predicate,
        sort: &SortKey,
        page: u32,
        limit: PageSize,
    ) -> DbResult<Vec<Item>> {
        let started = Instant::now();
        let offset = i64::from(page.max(1) - 1) * i64::from(limit.get());

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT ");
        qb.push(sql::ITEM_COLUMNS).push(sql::ITEM_SOURCE);
        sql::push_where(&mut qb, predicate);
        qb.push(sql::order_by(sort))
            .push(" LIMIT ")
            .push_bind(i64::from(limit.get()))
            .push(" OFFSET ")
            .push_bind(offset);

        let items: Vec<Item> = qb.build_query_as::<Item>().fetch_all(&self.pool).await?;

        debug!(
            page = page,
            limit = limit.get(),
            sort = %sort,
            returned = items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Listed item page"
        );

        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
