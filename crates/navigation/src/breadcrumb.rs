//! Breadcrumb deriver.

use serde::Serialize;

use campus_core::{is_segment_prefix, normalize};

use crate::filter::FilteredNavigation;
use crate::tree::{Crumb, NavigationNode};

/// Root-first trail ending at the active location. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Breadcrumb(Vec<Crumb>);

impl Breadcrumb {
    pub fn crumbs(&self) -> &[Crumb] {
        &self.0
    }

    pub fn current(&self) -> &Crumb {
        // The trail always holds at least the home entry.
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Derive the breadcrumb for `path` from the role's filtered navigation.
///
/// The deepest node whose path is a segment prefix of `path` is the active
/// node (first in source order on ties). The trail is that node's ancestors
/// that also prefix `path`, root first, with entries for the same path
/// collapsed. The role's home entry leads the trail only when it is itself
/// an ancestor of the first entry; with no matching node it is the whole
/// trail.
pub fn derive(navigation: &FilteredNavigation, path: &str) -> Breadcrumb {
    let path = normalize(path);

    let mut best: Option<Vec<&NavigationNode>> = None;
    let mut chain = Vec::new();
    for category in &navigation.categories {
        for item in &category.items {
            visit(item, &path, &mut chain, &mut best);
        }
    }

    let mut matched: Vec<&NavigationNode> = best
        .unwrap_or_default()
        .into_iter()
        .filter(|node| is_segment_prefix(node.path.as_str(), &path))
        .collect();
    // Prefixes of one path nest, so length order is root-to-leaf order.
    matched.sort_by_key(|node| node.path.as_str().len());

    let mut crumbs: Vec<Crumb> = Vec::with_capacity(matched.len() + 1);
    for node in matched {
        if crumbs.last().is_some_and(|c| c.path == node.path.as_str()) {
            continue;
        }
        crumbs.push(Crumb {
            path: node.path.to_string(),
            label: node.label.clone(),
        });
    }

    let home = &navigation.home;
    let leads = match crumbs.first() {
        None => true,
        Some(first) => first.path != home.path && is_segment_prefix(&home.path, &first.path),
    };
    if leads {
        crumbs.insert(0, home.clone());
    }

    Breadcrumb(crumbs)
}

fn visit<'a>(
    node: &'a NavigationNode,
    path: &str,
    chain: &mut Vec<&'a NavigationNode>,
    best: &mut Option<Vec<&'a NavigationNode>>,
) {
    chain.push(node);

    if is_segment_prefix(node.path.as_str(), path) {
        let deeper = match best.as_ref().and_then(|b| b.last()) {
            Some(current) => node.path.as_str().len() > current.path.as_str().len(),
            None => true,
        };
        if deeper {
            *best = Some(chain.clone());
        }
    }

    for child in &node.children {
        visit(child, path, chain, best);
    }

    chain.pop();
}
