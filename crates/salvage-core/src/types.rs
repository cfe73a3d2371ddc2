//! # Domain Types
//!
//! Core domain types of the salvage catalog.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    Category     │   │     Vendor      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (ItemId)    │   │  id             │   │  id             │       │
//! │  │  status         │   │  slug (unique)  │   │  shop_name      │       │
//! │  │  availability   │   │  parent ──┐     │   └─────────────────┘       │
//! │  │  classification │   │           ▼     │                             │
//! │  │  category_id ───┼──►│  CategoryRef    │                             │
//! │  │  vendor_id      │   │  (one level)    │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifiers
//! Item and category ids arrive from data sources as integers or strings.
//! Every id is held as a string newtype; numeric ids are converted once at
//! the edge (`ItemId::from(11_i64)` is `"11"`) so values are never compared
//! across types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{price_label, Money};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(String);

        impl $name {
            /// Wraps an already-canonical string id.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Identifier of a catalog item.
    ItemId
}

string_id! {
    /// Identifier of a category.
    CategoryId
}

string_id! {
    /// Identifier of a vendor (shop).
    VendorId
}

// =============================================================================
// Item Lifecycle Enums
// =============================================================================

/// Publication status. Only `Published` items are ever public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ItemStatus {
    #[default]
    Draft,
    Published,
}

impl ItemStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Draft => "draft",
            ItemStatus::Published => "published",
        }
    }
}

/// Whether a one-off item is still for sale.
///
/// Items are unique: once `Sold` they never return to `Available`. Sold
/// items stay listed (marked sold) in the public catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Availability {
    #[default]
    Available,
    Sold,
}

impl Availability {
    /// Availability states shown in the public catalog.
    pub const PUBLIC: [Availability; 2] = [Availability::Available, Availability::Sold];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Sold => "sold",
        }
    }
}

/// Era classification of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Classification {
    Antique,
    Vintage,
    Modern,
}

impl Classification {
    /// All classifications in display order.
    pub const ALL: [Classification; 3] = [
        Classification::Antique,
        Classification::Vintage,
        Classification::Modern,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Classification::Antique => "antique",
            Classification::Vintage => "vintage",
            Classification::Modern => "modern",
        }
    }

    /// Human label for filter chips and facet lists.
    pub const fn label(&self) -> &'static str {
        match self {
            Classification::Antique => "Antique",
            Classification::Vintage => "Vintage",
            Classification::Modern => "Modern",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "antique" => Ok(Classification::Antique),
            "vintage" => Ok(Classification::Vintage),
            "modern" => Ok(Classification::Modern),
            _ => Err(ValidationError::not_allowed(
                "classification",
                &["antique", "vintage", "modern"],
            )),
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A unique salvage item listed by a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Price in minor units. `None` = price on application.
    pub price_minor: Option<i64>,

    pub status: ItemStatus,

    pub availability: Availability,

    pub classification: Option<Classification>,

    pub category_id: Option<CategoryId>,

    /// Owning vendor.
    pub vendor_id: VendorId,

    /// Reference to the primary image (storage key or URL).
    pub thumbnail: Option<String>,

    pub featured: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Returns the price, or `None` for price on application.
    #[inline]
    pub fn price(&self) -> Option<Money> {
        self.price_minor.map(Money::from_minor)
    }

    /// Price formatted for display (`"£45.00"` or `"POA"`).
    pub fn price_label(&self) -> String {
        price_label(self.price())
    }

    /// True when the item may appear in any public listing or count.
    pub fn is_public(&self) -> bool {
        self.status == ItemStatus::Published && Availability::PUBLIC.contains(&self.availability)
    }

    #[inline]
    pub fn is_sold(&self) -> bool {
        self.availability == Availability::Sold
    }
}

// =============================================================================
// Category
// =============================================================================

/// Summary of a parent category as returned alongside its child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A category as returned by the category data source.
///
/// The hierarchy is two levels deep: a category with a `parent` is a child,
/// one without is top-level. Nothing at the storage layer enforces that the
/// parent is itself top-level; the tree builder copes with violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent: Option<CategoryRef>,
}

impl Category {
    /// Creates a top-level category.
    pub fn top_level(id: impl Into<CategoryId>, name: &str, slug: &str) -> Self {
        Category {
            id: id.into(),
            name: name.to_string(),
            slug: slug.to_string(),
            parent: None,
        }
    }

    /// Creates a child category under `parent`.
    pub fn child_of(parent: &Category, id: impl Into<CategoryId>, name: &str, slug: &str) -> Self {
        Category {
            id: id.into(),
            name: name.to_string(),
            slug: slug.to_string(),
            parent: Some(CategoryRef {
                id: parent.id.clone(),
                name: parent.name.clone(),
                slug: parent.slug.clone(),
            }),
        }
    }

    /// Parent id, ignoring a pointer back to the category itself.
    pub fn parent_id(&self) -> Option<&CategoryId> {
        self.parent
            .as_ref()
            .map(|p| &p.id)
            .filter(|parent_id| **parent_id != self.id)
    }

    /// True for categories the tree builder places at the top level.
    pub fn is_top_level(&self) -> bool {
        self.parent_id().is_none()
    }
}

// =============================================================================
// Vendor
// =============================================================================

/// A vendor (shop) that owns items. Used only as a filter and grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vendor {
    pub id: VendorId,
    pub shop_name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: ItemStatus, availability: Availability) -> Item {
        let now = Utc::now();
        Item {
            id: ItemId::from(1_i64),
            name: "Cast Iron Radiator".to_string(),
            price_minor: None,
            status,
            availability,
            classification: Some(Classification::Antique),
            category_id: None,
            vendor_id: VendorId::from("v-1"),
            thumbnail: None,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        assert_eq!(ItemId::from(11_i64), ItemId::from("11"));
        assert_eq!(CategoryId::from(2_i64).as_str(), "2");
    }

    #[test]
    fn test_classification_parsing() {
        assert_eq!("vintage".parse::<Classification>().unwrap(), Classification::Vintage);
        assert_eq!(" Antique ".parse::<Classification>().unwrap(), Classification::Antique);
        assert!("all".parse::<Classification>().is_err());
        assert!("edwardian".parse::<Classification>().is_err());
    }

    #[test]
    fn test_only_published_items_are_public() {
        assert!(item(ItemStatus::Published, Availability::Available).is_public());
        assert!(item(ItemStatus::Published, Availability::Sold).is_public());
        assert!(!item(ItemStatus::Draft, Availability::Available).is_public());
    }

    #[test]
    fn test_price_on_application() {
        let mut it = item(ItemStatus::Published, Availability::Available);
        assert_eq!(it.price_label(), "POA");
        it.price_minor = Some(32_000);
        assert_eq!(it.price_label(), "£320.00");
    }

    #[test]
    fn test_self_referential_parent_is_top_level() {
        let mut cat = Category::top_level("5", "Doors", "doors");
        cat.parent = Some(CategoryRef {
            id: CategoryId::from("5"),
            name: "Doors".to_string(),
            slug: "doors".to_string(),
        });
        assert!(cat.is_top_level());
        assert_eq!(cat.parent_id(), None);
    }

    #[test]
    fn test_child_of_points_at_parent() {
        let hardware = Category::top_level("1", "Hardware", "hardware");
        let hinges = Category::child_of(&hardware, "2", "Hinges", "hinges");
        assert_eq!(hinges.parent_id(), Some(&CategoryId::from("1")));
        assert!(!hinges.is_top_level());
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let json = serde_json::to_value(item(ItemStatus::Published, Availability::Sold)).unwrap();
        assert_eq!(json["availability"], "sold");
        assert_eq!(json["vendorId"], "v-1");
        assert!(json["priceMinor"].is_null());
    }
}
