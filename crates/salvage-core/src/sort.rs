//! # Sort Keys
//!
//! External form is a field name with an optional `-` prefix for descending
//! (`createdAt`, `-price`). Whatever the key, ordering is completed by id
//! ascending so pages never shuffle between requests.
//!
//! Items without a price (POA) always come after priced items, in both
//! directions.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::Item;

// =============================================================================
// Sort Field / Direction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Price,
    Name,
    Id,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Price,
        SortField::Name,
        SortField::Id,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Price => "price",
            SortField::Name => "name",
            SortField::Id => "id",
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortField::UpdatedAt),
            "price" => Ok(SortField::Price),
            "name" => Ok(SortField::Name),
            "id" => Ok(SortField::Id),
            _ => Err(ValidationError::not_allowed(
                "sort",
                &["createdAt", "updatedAt", "price", "name", "id"],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

// =============================================================================
// Sort Key
// =============================================================================

/// A parsed `sort` parameter.
///
/// ```rust
/// use salvage_core::sort::{SortDirection, SortField, SortKey};
///
/// let key: SortKey = "-price".parse().unwrap();
/// assert_eq!(key.field, SortField::Price);
/// assert_eq!(key.direction, SortDirection::Desc);
/// assert_eq!(key.to_string(), "-price");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub const fn asc(field: SortField) -> Self {
        SortKey {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(field: SortField) -> Self {
        SortKey {
            field,
            direction: SortDirection::Desc,
        }
    }

    #[inline]
    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Desc
    }

    /// Total order over items for this key, id ascending as the last resort.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let primary = match self.field {
            SortField::Price => {
                return match (a.price_minor, b.price_minor) {
                    (Some(x), Some(y)) => self.directed(x.cmp(&y)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
                .then_with(|| a.id.cmp(&b.id));
            }
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Name => a
                .name
                .to_ascii_lowercase()
                .cmp(&b.name.to_ascii_lowercase()),
            SortField::Id => id_order(a.id.as_str(), b.id.as_str()),
        };

        self.directed(primary).then_with(|| a.id.cmp(&b.id))
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Shorter ids first, then text order, so canonical numeric ids sort
/// numerically (`"9"` before `"10"`). Mirrors `length(id), id` in SQL.
fn id_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Newest first.
impl Default for SortKey {
    fn default() -> Self {
        SortKey::desc(SortField::CreatedAt)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_descending() {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix('-') {
            Some(field) => Ok(SortKey::desc(field.parse()?)),
            None => Ok(SortKey::asc(s.parse()?)),
        }
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
