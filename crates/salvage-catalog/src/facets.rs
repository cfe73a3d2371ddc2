//! # Facet Count Aggregation
//!
//! Each facet counts the items matching every active filter *except* its own
//! dimension, so selecting a category never hides its siblings' counts.
//!
//! ```text
//! criteria {category: hinges, classification: antique}
//!
//!   category tree      ← compose(criteria.without_category())       by category_id
//!   classification     ← compose(criteria.without_classification()) by classification
//!   vendor             ← compose(criteria.without_vendor())         by vendor_id
//! ```
//!
//! Counts are recomputed from scratch on every request.

use std::collections::HashMap;

use salvage_core::{
    compose, Category, CategoryTree, Classification, FacetEntry, FilterCriteria, GroupCount,
    GroupField, Vendor, VendorId,
};

use crate::error::CatalogResult;
use crate::source::CatalogSource;

/// Criteria for counting along `group`: every filter except that dimension.
pub fn facet_criteria(criteria: &FilterCriteria, group: GroupField) -> FilterCriteria {
    match group {
        GroupField::CategoryId => criteria.without_category(),
        GroupField::Classification => criteria.without_classification(),
        GroupField::Vendor => criteria.without_vendor(),
    }
}

/// Fetches the grouped count for one facet dimension.
pub async fn dimension_counts(
    source: &dyn CatalogSource,
    criteria: &FilterCriteria,
    group: GroupField,
) -> CatalogResult<Vec<GroupCount>> {
    let predicate = compose(&facet_criteria(criteria, group));
    source.grouped_count(&predicate, group).await
}

/// Builds the category tree from the full category list and counts it.
pub fn category_tree(categories: &[Category], counts: &[GroupCount]) -> CategoryTree {
    CategoryTree::with_counts(categories, counts)
}

/// Classification entries in display order.
///
/// Zero-count entries are left out unless selected. Unclassified items are
/// counted by the source but have no entry.
pub fn classification_entries(
    counts: &[GroupCount],
    active: Option<Classification>,
) -> Vec<FacetEntry> {
    let by_value = count_map(counts);

    Classification::ALL
        .iter()
        .map(|classification| FacetEntry {
            value: classification.as_str().to_string(),
            label: classification.label().to_string(),
            count: by_value.get(classification.as_str()).copied().unwrap_or(0),
            active: active == Some(*classification),
        })
        .filter(|entry| entry.count > 0 || entry.active)
        .collect()
}

/// Vendor entries in directory order, labelled with the shop name.
///
/// A counted or active vendor missing from the directory is listed after
/// the known ones under its id.
pub fn vendor_entries(
    counts: &[GroupCount],
    vendors: &[Vendor],
    active: Option<&VendorId>,
) -> Vec<FacetEntry> {
    let by_value = count_map(counts);
    let is_active = |id: &str| active.is_some_and(|a| a.as_str() == id);

    let mut entries: Vec<FacetEntry> = vendors
        .iter()
        .map(|vendor| FacetEntry {
            value: vendor.id.as_str().to_string(),
            label: vendor.shop_name.clone(),
            count: by_value.get(vendor.id.as_str()).copied().unwrap_or(0),
            active: is_active(vendor.id.as_str()),
        })
        .filter(|entry| entry.count > 0 || entry.active)
        .collect();

    for count in counts {
        let Some(id) = count.group_value.as_deref() else {
            continue;
        };
        if vendors.iter().all(|v| v.id.as_str() != id) {
            entries.push(FacetEntry {
                value: id.to_string(),
                label: id.to_string(),
                count: count.count,
                active: is_active(id),
            });
        }
    }

    if let Some(active) = active {
        if entries.iter().all(|e| e.value != active.as_str()) {
            entries.push(FacetEntry {
                value: active.as_str().to_string(),
                label: active.as_str().to_string(),
                count: 0,
                active: true,
            });
        }
    }

    entries
}

fn count_map(counts: &[GroupCount]) -> HashMap<&str, u64> {
    counts
        .iter()
        .filter_map(|c| c.group_value.as_deref().map(|value| (value, c.count)))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
