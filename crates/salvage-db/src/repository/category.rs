//! # Category Repository
//!
//! The category taxonomy. Categories are read in full on every catalog
//! request (the tree builder needs empty categories too), so `list` returns
//! every row with its parent summary joined in.

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use salvage_core::validation::{validate_name, validate_slug};
use salvage_core::{Category, CategoryId, CategoryRef};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
    parent_id: Option<CategoryId>,
    parent_name: Option<String>,
    parent_slug: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        let parent = match (row.parent_id, row.parent_name, row.parent_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategoryRef { id, name, slug }),
            _ => None,
        };
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            parent,
        }
    }
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists every category in taxonomy order (insertion order, then name).
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.name,
                c.slug,
                p.id   AS parent_id,
                p.name AS parent_name,
                p.slug AS parent_slug
            FROM categories c
            LEFT JOIN categories p ON p.id = c.parent_id
            ORDER BY c.sort_order, c.name, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed categories");
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Inserts a category, appending it to the taxonomy order.
    ///
    /// ## Returns
    /// * `Err(DbError::Invalid)` - bad slug or name
    /// * `Err(DbError::UniqueViolation)` - slug already taken
    /// * `Err(DbError::ForeignKeyViolation)` - parent doesn't exist
    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        validate_slug(&category.slug)?;
        validate_name("name", &category.name)?;

        debug!(slug = %category.slug, "Inserting category");

        let parent_id = category.parent.as_ref().map(|p| &p.id);

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, parent_id, sort_order)
            VALUES (?1, ?2, ?3, ?4, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM categories))
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(parent_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
