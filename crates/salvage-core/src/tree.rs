//! # Category Tree
//!
//! Two-level category tree with facet counts.
//!
//! ## Build, then Count
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category list                CategoryTree::build            skeleton   │
//! │  ──────────────               ──────────────────►           (all zero)  │
//! │  1 Hardware                                                              │
//! │  2 Hinges  (parent 1)         1 Hardware  total 0                        │
//! │  3 Doors                        └─ 2 Hinges  count 0                     │
//! │                               3 Doors     total 0                        │
//! │                                                                          │
//! │  Grouped count by category id    apply_counts                            │
//! │  ─────────────────────────────   ─────────────►                          │
//! │  "2" → 1   (child)                 Hinges.count += 1, Hardware.total += 1│
//! │  "1" → 1   (top-level, direct)     Hardware.total += 1                   │
//! │  "9" → 4   (unknown)               ignored                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invariant: a node's `total_count` equals the number of matching items
//! whose category is that node or one of its children.
//!
//! Structural anomalies never fail the build:
//! - a parent pointer back to the category itself makes it top-level
//! - a child whose parent is not a top-level category is dropped (this
//!   covers dangling parents and third-level nodes)

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use ts_rs::TS;

use crate::facet::GroupCount;
use crate::types::{Category, CategoryId};

// =============================================================================
// Nodes
// =============================================================================

/// A second-level category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChildNode {
    pub name: String,
    pub slug: String,
    #[ts(type = "number")]
    pub count: u64,
}

/// A top-level category and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TreeNode {
    pub name: String,
    pub slug: String,
    /// Direct items plus all children's items.
    #[ts(type = "number")]
    pub total_count: u64,
    pub children: IndexMap<CategoryId, ChildNode>,
}

impl TreeNode {
    /// Items filed directly on this node rather than on a child.
    pub fn direct_count(&self) -> u64 {
        let children: u64 = self.children.values().map(|c| c.count).sum();
        self.total_count.saturating_sub(children)
    }
}

// =============================================================================
// Tree
// =============================================================================

/// Category id → top-level node, in category-source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTree {
    nodes: IndexMap<CategoryId, TreeNode>,
}

impl CategoryTree {
    /// Builds a zero-count skeleton from the full category list.
    pub fn build(categories: &[Category]) -> Self {
        let mut nodes: IndexMap<CategoryId, TreeNode> = categories
            .iter()
            .filter(|c| c.is_top_level())
            .map(|c| {
                (
                    c.id.clone(),
                    TreeNode {
                        name: c.name.clone(),
                        slug: c.slug.clone(),
                        total_count: 0,
                        children: IndexMap::new(),
                    },
                )
            })
            .collect();

        for category in categories {
            let Some(parent_id) = category.parent_id() else {
                continue;
            };
            if let Some(parent) = nodes.get_mut(parent_id) {
                parent.children.insert(
                    category.id.clone(),
                    ChildNode {
                        name: category.name.clone(),
                        slug: category.slug.clone(),
                        count: 0,
                    },
                );
            }
        }

        CategoryTree { nodes }
    }

    /// Merges grouped counts (keyed by category id) into the tree.
    ///
    /// Counts for ids absent from the tree, and the uncategorized group,
    /// are ignored. Repeated ids accumulate.
    pub fn apply_counts(&mut self, counts: &[GroupCount]) {
        let parent_of: HashMap<CategoryId, CategoryId> = self
            .nodes
            .iter()
            .flat_map(|(parent_id, node)| {
                node.children
                    .keys()
                    .map(move |child_id| (child_id.clone(), parent_id.clone()))
            })
            .collect();

        for row in counts {
            let Some(value) = row.group_value.as_deref() else {
                continue;
            };
            let id = CategoryId::from(value);

            if let Some(parent_id) = parent_of.get(&id) {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    if let Some(child) = parent.children.get_mut(&id) {
                        child.count += row.count;
                    }
                    parent.total_count += row.count;
                }
            } else if let Some(node) = self.nodes.get_mut(&id) {
                node.total_count += row.count;
            }
        }
    }

    /// Builds the tree and applies counts in one step.
    pub fn with_counts(categories: &[Category], counts: &[GroupCount]) -> Self {
        let mut tree = CategoryTree::build(categories);
        tree.apply_counts(counts);
        tree
    }

    pub fn get(&self, id: &CategoryId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &TreeNode)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all top-level totals: every categorized matching item once.
    pub fn total(&self) -> u64 {
        self.nodes.values().map(|n| n.total_count).sum()
    }

    /// Finds the display name for a slug at either level.
    pub fn name_for_slug(&self, slug: &str) -> Option<&str> {
        self.nodes.values().find_map(|node| {
            if node.slug == slug {
                Some(node.name.as_str())
            } else {
                node.children
                    .values()
                    .find(|c| c.slug == slug)
                    .map(|c| c.name.as_str())
            }
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryRef;
    use pretty_assertions::assert_eq;

    fn taxonomy() -> Vec<Category> {
        let hardware = Category::top_level("1", "Hardware", "hardware");
        let hinges = Category::child_of(&hardware, "2", "Hinges", "hinges");
        let handles = Category::child_of(&hardware, "4", "Handles", "handles");
        let doors = Category::top_level("3", "Doors", "doors");
        vec![hinges, hardware, doors, handles]
    }

    #[test]
    fn test_build_skeleton() {
        let tree = CategoryTree::build(&taxonomy());

        assert_eq!(tree.len(), 2);
        let hardware = tree.get(&CategoryId::from("1")).unwrap();
        assert_eq!(hardware.total_count, 0);
        assert_eq!(
            hardware.children.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
            vec!["2", "4"]
        );
        assert!(tree.get(&CategoryId::from("3")).unwrap().children.is_empty());
    }

    #[test]
    fn test_child_listed_before_parent_is_attached() {
        // taxonomy() lists Hinges ahead of Hardware
        let tree = CategoryTree::build(&taxonomy());
        assert!(tree
            .get(&CategoryId::from("1"))
            .unwrap()
            .children
            .contains_key(&CategoryId::from("2")));
    }

    #[test]
    fn test_dangling_parent_is_dropped() {
        let mut orphan = Category::top_level("8", "Orphan", "orphan");
        orphan.parent = Some(CategoryRef {
            id: CategoryId::from("99"),
            name: "Gone".to_string(),
            slug: "gone".to_string(),
        });
        let tree = CategoryTree::build(&[orphan]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_self_parent_becomes_top_level() {
        let mut odd = Category::top_level("5", "Fireplaces", "fireplaces");
        odd.parent = Some(CategoryRef {
            id: CategoryId::from("5"),
            name: "Fireplaces".to_string(),
            slug: "fireplaces".to_string(),
        });
        let tree = CategoryTree::build(&[odd]);
        assert_eq!(tree.get(&CategoryId::from("5")).unwrap().slug, "fireplaces");
    }

    #[test]
    fn test_third_level_is_dropped() {
        let hardware = Category::top_level("1", "Hardware", "hardware");
        let hinges = Category::child_of(&hardware, "2", "Hinges", "hinges");
        let butt = Category::child_of(&hinges, "6", "Butt Hinges", "butt-hinges");
        let tree = CategoryTree::build(&[hardware, hinges, butt]);

        let node = tree.get(&CategoryId::from("1")).unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(tree.name_for_slug("butt-hinges"), None);
    }

    #[test]
    fn test_apply_counts_rolls_up() {
        let mut tree = CategoryTree::build(&taxonomy());
        tree.apply_counts(&[
            GroupCount::new("2", 1),
            GroupCount::new("1", 1),
            GroupCount::new("3", 5),
            GroupCount::new("99", 7),
            GroupCount {
                group_value: None,
                count: 4,
            },
        ]);

        let hardware = tree.get(&CategoryId::from("1")).unwrap();
        assert_eq!(hardware.total_count, 2);
        assert_eq!(hardware.direct_count(), 1);
        assert_eq!(hardware.children[&CategoryId::from("2")].count, 1);
        assert_eq!(hardware.children[&CategoryId::from("4")].count, 0);
        assert_eq!(tree.get(&CategoryId::from("3")).unwrap().total_count, 5);
        assert_eq!(tree.total(), 7);
    }

    #[test]
    fn test_serializes_as_id_map() {
        let hardware = Category::top_level("1", "Hardware", "hardware");
        let hinges = Category::child_of(&hardware, "2", "Hinges", "hinges");
        let tree = CategoryTree::with_counts(
            &[hardware, hinges],
            &[GroupCount::new("2", 1), GroupCount::new("1", 1)],
        );

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["1"]["totalCount"], 2);
        assert_eq!(json["1"]["children"]["2"]["count"], 1);
        assert_eq!(json["1"]["slug"], "hardware");
    }

    #[test]
    fn test_name_for_slug() {
        let tree = CategoryTree::build(&taxonomy());
        assert_eq!(tree.name_for_slug("hinges"), Some("Hinges"));
        assert_eq!(tree.name_for_slug("doors"), Some("Doors"));
        assert_eq!(tree.name_for_slug("gates"), None);
    }
}
