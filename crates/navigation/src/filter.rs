//! Navigation hierarchy builder: prune the tree down to what a role may see.

use std::collections::HashSet;

use serde::Serialize;

use campus_auth::Role;

use crate::tree::{Crumb, NavigationCategory, NavigationNode, NavigationTree};

/// The navigation a single role is allowed to see.
///
/// Same shape as the source tree, in source order, with every branch that
/// lost all of its leaves removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredNavigation {
    pub role: Role,
    pub home: Crumb,
    pub categories: Vec<NavigationCategory>,
}

impl FilteredNavigation {
    /// Depth-first walk over every surviving node (parents before children).
    pub fn nodes(&self) -> impl Iterator<Item = &NavigationNode> {
        let mut stack: Vec<&NavigationNode> = self
            .categories
            .iter()
            .rev()
            .flat_map(|c| c.items.iter().rev())
            .collect();

        core::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Filter `tree` for `role`.
///
/// A node survives when the role is in its own `allowed_roles`; a node with
/// children additionally needs at least one surviving child. Categories are
/// checked the same way against their own role set. Leaves repeating a path
/// already emitted are dropped (first occurrence wins).
pub fn filter_for_role(tree: &NavigationTree, role: Role) -> FilteredNavigation {
    let mut seen = HashSet::new();

    let categories = tree
        .categories
        .iter()
        .filter(|category| category.allowed_roles.contains(role))
        .filter_map(|category| {
            let items = filter_nodes(&category.items, role, &mut seen);
            (!items.is_empty()).then(|| NavigationCategory {
                label: category.label.clone(),
                icon: category.icon.clone(),
                allowed_roles: category.allowed_roles,
                items,
            })
        })
        .collect();

    FilteredNavigation {
        role,
        home: tree.home(role).clone(),
        categories,
    }
}

fn filter_nodes(nodes: &[NavigationNode], role: Role, seen: &mut HashSet<String>) -> Vec<NavigationNode> {
    nodes
        .iter()
        .filter_map(|node| filter_node(node, role, seen))
        .collect()
}

fn filter_node(node: &NavigationNode, role: Role, seen: &mut HashSet<String>) -> Option<NavigationNode> {
    if !node.allowed_roles.contains(role) {
        return None;
    }

    if node.is_leaf() {
        if !seen.insert(node.path.to_string()) {
            return None;
        }
        return Some(node.clone());
    }

    let children = filter_nodes(&node.children, role, seen);
    if children.is_empty() {
        return None;
    }

    Some(NavigationNode {
        path: node.path.clone(),
        label: node.label.clone(),
        icon: node.icon.clone(),
        allowed_roles: node.allowed_roles,
        children,
    })
}
