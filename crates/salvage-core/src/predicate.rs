//! # Filter Compositor
//!
//! Turns [`FilterCriteria`] into one [`Predicate`] value. The same value is
//! handed to the facet count query, the item page query and the total
//! count, so the three can never disagree about what "matching" means.
//!
//! ## Shape
//! ```text
//! And[
//!   Equals(status, "published"),                         always
//!   Or[Equals(availability, "available"),                always
//!      Equals(availability, "sold")],
//!   Equals(vendorId, v),                                 vendor set
//!   Equals(classification, c),                           classification set
//!   Or[Equals(categorySlug, s), Equals(parentSlug, s)],  category set
//!   Or[Contains(name, q), Equals(id, n)],                search set
//! ]                                      └─ only when q is a whole integer
//! ```
//!
//! Consumers: `salvage-db` translates the tree to SQL; the in-memory source
//! evaluates it with [`Predicate::matches`].

use serde::Serialize;
use std::collections::HashMap;

use crate::filter::FilterCriteria;
use crate::types::{Availability, Category, CategoryId, Item, ItemStatus};
use crate::validation::parse_integer_search;

// =============================================================================
// Fields
// =============================================================================

/// Item attributes a predicate can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Name,
    Status,
    Availability,
    Classification,
    VendorId,
    /// Slug of the item's own category.
    CategorySlug,
    /// Slug of the parent of the item's category.
    ParentCategorySlug,
}

// =============================================================================
// Predicate
// =============================================================================

/// A closed predicate tree over item fields.
///
/// Values are canonical strings: enum values use their lowercase wire form,
/// ids their string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Predicate {
    Equals { field: Field, value: String },
    /// Substring match, case-insensitive for ASCII letters (as SQLite `LIKE`).
    Contains { field: Field, value: String },
    Or(Vec<Predicate>),
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn contains(field: Field, value: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            value: value.into(),
        }
    }

    /// Evaluates the predicate against one item.
    ///
    /// `categories` resolves the item's category id to its slug and its
    /// parent's slug. An empty `Or` matches nothing, an empty `And`
    /// matches everything.
    pub fn matches(&self, item: &Item, categories: &CategoryLookup) -> bool {
        match self {
            Predicate::Equals { field, value } => {
                field_value(item, *field, categories).is_some_and(|v| v == *value)
            }
            Predicate::Contains { field, value } => field_value(item, *field, categories)
                .is_some_and(|v| v.to_ascii_lowercase().contains(&value.to_ascii_lowercase())),
            Predicate::Or(clauses) => clauses.iter().any(|p| p.matches(item, categories)),
            Predicate::And(clauses) => clauses.iter().all(|p| p.matches(item, categories)),
        }
    }

    /// True when the tree mentions `field` anywhere.
    pub fn references(&self, field: Field) -> bool {
        match self {
            Predicate::Equals { field: f, .. } | Predicate::Contains { field: f, .. } => {
                *f == field
            }
            Predicate::Or(clauses) | Predicate::And(clauses) => {
                clauses.iter().any(|p| p.references(field))
            }
        }
    }
}

fn field_value<'a>(item: &'a Item, field: Field, categories: &'a CategoryLookup) -> Option<&'a str> {
    match field {
        Field::Id => Some(item.id.as_str()),
        Field::Name => Some(item.name.as_str()),
        Field::Status => Some(item.status.as_str()),
        Field::Availability => Some(item.availability.as_str()),
        Field::Classification => item.classification.as_ref().map(|c| c.as_str()),
        Field::VendorId => Some(item.vendor_id.as_str()),
        Field::CategorySlug => item
            .category_id
            .as_ref()
            .and_then(|id| categories.slug(id)),
        Field::ParentCategorySlug => item
            .category_id
            .as_ref()
            .and_then(|id| categories.parent_slug(id)),
    }
}

// =============================================================================
// Category Lookup
// =============================================================================

/// Resolves category ids to slugs for in-process predicate evaluation.
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    entries: HashMap<CategoryId, (String, Option<String>)>,
}

impl CategoryLookup {
    pub fn new(categories: &[Category]) -> Self {
        let entries = categories
            .iter()
            .map(|c| {
                let parent_slug = c
                    .parent_id()
                    .and(c.parent.as_ref())
                    .map(|p| p.slug.clone());
                (c.id.clone(), (c.slug.clone(), parent_slug))
            })
            .collect();
        CategoryLookup { entries }
    }

    pub fn slug(&self, id: &CategoryId) -> Option<&str> {
        self.entries.get(id).map(|(slug, _)| slug.as_str())
    }

    pub fn parent_slug(&self, id: &CategoryId) -> Option<&str> {
        self.entries.get(id).and_then(|(_, parent)| parent.as_deref())
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Builds the predicate for a set of criteria.
///
/// ```rust
/// use salvage_core::filter::FilterCriteria;
/// use salvage_core::predicate::{compose, Field};
///
/// let criteria = FilterCriteria { search: Some("11".into()), ..Default::default() };
/// let predicate = compose(&criteria);
/// assert!(predicate.references(Field::Id));
/// assert!(predicate.references(Field::Name));
/// ```
pub fn compose(criteria: &FilterCriteria) -> Predicate {
    let mut clauses = vec![
        Predicate::equals(Field::Status, ItemStatus::Published.as_str()),
        Predicate::Or(
            Availability::PUBLIC
                .iter()
                .map(|a| Predicate::equals(Field::Availability, a.as_str()))
                .collect(),
        ),
    ];

    if let Some(vendor) = &criteria.vendor {
        clauses.push(Predicate::equals(Field::VendorId, vendor.as_str()));
    }

    if let Some(classification) = criteria.classification {
        clauses.push(Predicate::equals(Field::Classification, classification.as_str()));
    }

    if let Some(slug) = criteria.category.as_deref().filter(|s| !s.is_empty()) {
        clauses.push(Predicate::Or(vec![
            Predicate::equals(Field::CategorySlug, slug),
            Predicate::equals(Field::ParentCategorySlug, slug),
        ]));
    }

    if let Some(search) = criteria.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let mut alternatives = vec![Predicate::contains(Field::Name, search.trim())];
        if let Some(id) = parse_integer_search(search) {
            alternatives.push(Predicate::equals(Field::Id, id));
        }
        clauses.push(Predicate::Or(alternatives));
    }

    Predicate::And(clauses)
}

// =============================================================================
// Unit Tests
// =============================================================================
