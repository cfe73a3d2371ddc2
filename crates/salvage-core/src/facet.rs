//! # Facet Types
//!
//! Grouped-count contract shared by every data source, and the flat facet
//! lists built from it for the non-hierarchical dimensions.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Item attribute a grouped count can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupField {
    CategoryId,
    Classification,
    Vendor,
}

/// One row of a grouped count.
///
/// `group_value` is `None` for items with no value in the grouped column
/// (an uncategorized item, an unclassified item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub group_value: Option<String>,
    pub count: u64,
}

impl GroupCount {
    pub fn new(group_value: impl Into<String>, count: u64) -> Self {
        GroupCount {
            group_value: Some(group_value.into()),
            count,
        }
    }
}

/// One entry of a flat facet list (classification, vendor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FacetEntry {
    /// Value to put in the query string when selected.
    pub value: String,
    pub label: String,
    #[ts(type = "number")]
    pub count: u64,
    pub active: bool,
}
