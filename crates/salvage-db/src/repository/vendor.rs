//! # Vendor Repository
//!
//! Vendor directory. Vendors only matter to the catalog as a filter and a
//! grouping key; the shop name labels vendor facet entries.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use salvage_core::validation::validate_name;
use salvage_core::{Vendor, VendorId};

#[derive(Debug, Clone)]
pub struct VendorRepository {
    pool: SqlitePool,
}

impl VendorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VendorRepository { pool }
    }

    /// Lists vendors alphabetically by shop name.
    pub async fn list(&self) -> DbResult<Vec<Vendor>> {
        let vendors: Vec<Vendor> = sqlx::query_as(
            r#"
            SELECT id, shop_name
            FROM vendors
            ORDER BY shop_name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = vendors.len(), "Listed vendors");
        Ok(vendors)
    }

    pub async fn get_by_id(&self, id: &VendorId) -> DbResult<Option<Vendor>> {
        let vendor = sqlx::query_as("SELECT id, shop_name FROM vendors WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vendor)
    }

    /// Inserts a vendor.
    ///
    /// ## Returns
    /// * `Err(DbError::Invalid)` - blank shop name
    /// * `Err(DbError::UniqueViolation)` - id already used
    pub async fn insert(&self, vendor: &Vendor) -> DbResult<()> {
        validate_name("shop_name", &vendor.shop_name)?;

        debug!(id = %vendor.id, "Inserting vendor");

        sqlx::query("INSERT INTO vendors (id, shop_name) VALUES (?1, ?2)")
            .bind(&vendor.id)
            .bind(vendor.shop_name.trim())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Generates a new vendor id.
pub fn generate_vendor_id() -> VendorId {
    VendorId::new(Uuid::new_v4().to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
