//! # Sidebar Presentation
//!
//! View model for the category sidebar.
//!
//! [`derive_sidebar`] is a pure function of the counted tree and the active
//! category slug. [`SidebarState`] adds the expand/collapse toggles a user
//! makes afterwards; toggling is local and never causes a query.
//!
//! ## Visibility Rules
//! - a top-level node with `total_count == 0` is omitted with its children
//! - a child with `count == 0` is omitted on its own
//! - a top-level node starts expanded when it or one of its children is the
//!   active category

use serde::Serialize;
use std::collections::HashSet;
use ts_rs::TS;

use crate::tree::CategoryTree;
use crate::types::CategoryId;

// =============================================================================
// Sidebar Nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SidebarChild {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[ts(type = "number")]
    pub count: u64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SidebarNode {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[ts(type = "number")]
    pub total_count: u64,
    pub active: bool,
    /// Expanded on first render.
    pub initially_expanded: bool,
    pub children: Vec<SidebarChild>,
}

/// Derives the visible sidebar nodes from a counted tree.
pub fn derive_sidebar(tree: &CategoryTree, active_slug: Option<&str>) -> Vec<SidebarNode> {
    let is_active = |slug: &str| active_slug.is_some_and(|active| active == slug);

    tree.iter()
        .filter(|(_, node)| node.total_count > 0)
        .map(|(id, node)| {
            let children: Vec<SidebarChild> = node
                .children
                .iter()
                .filter(|(_, child)| child.count > 0)
                .map(|(child_id, child)| SidebarChild {
                    id: child_id.clone(),
                    name: child.name.clone(),
                    slug: child.slug.clone(),
                    count: child.count,
                    active: is_active(&child.slug),
                })
                .collect();

            // Checked against all children, visible or not, so an active
            // zero-count child still opens its parent
            let child_active = node.children.values().any(|c| is_active(&c.slug));
            let active = is_active(&node.slug);

            SidebarNode {
                id: id.clone(),
                name: node.name.clone(),
                slug: node.slug.clone(),
                total_count: node.total_count,
                active,
                initially_expanded: active || child_active,
                children,
            }
        })
        .collect()
}

// =============================================================================
// Sidebar State
// =============================================================================

/// One row of the rendered sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleNode<'a> {
    Parent { node: &'a SidebarNode, expanded: bool },
    Child { parent: &'a SidebarNode, child: &'a SidebarChild },
}

/// Derived sidebar plus the user's expand/collapse toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarState {
    nodes: Vec<SidebarNode>,
    expanded: HashSet<CategoryId>,
}

impl SidebarState {
    pub fn new(tree: &CategoryTree, active_slug: Option<&str>) -> Self {
        let nodes = derive_sidebar(tree, active_slug);
        let expanded = nodes
            .iter()
            .filter(|n| n.initially_expanded)
            .map(|n| n.id.clone())
            .collect();
        SidebarState { nodes, expanded }
    }

    /// Flips a top-level node. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &CategoryId) {
        if !self.nodes.iter().any(|n| &n.id == id) {
            return;
        }
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
    }

    pub fn is_expanded(&self, id: &CategoryId) -> bool {
        self.expanded.contains(id)
    }

    pub fn nodes(&self) -> &[SidebarNode] {
        &self.nodes
    }

    /// Rows in render order: every top-level node, followed by its children
    /// when expanded.
    pub fn visible_nodes(&self) -> Vec<VisibleNode<'_>> {
        let mut rows = Vec::new();
        for node in &self.nodes {
            let expanded = self.is_expanded(&node.id);
            rows.push(VisibleNode::Parent { node, expanded });
            if expanded {
                rows.extend(
                    node.children
                        .iter()
                        .map(|child| VisibleNode::Child { parent: node, child }),
                );
            }
        }
        rows
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
