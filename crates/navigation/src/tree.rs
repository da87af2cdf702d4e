//! Static navigation tree, bound to the route registry at load time.
//!
//! Entries only name a path; who may see an entry comes from the registry,
//! so navigation can never advertise a page the policy would refuse.

use std::collections::HashMap;

use serde::Serialize;

use campus_auth::{Role, RoleSet};
use campus_core::{ConfigError, ConfigResult, RoutePath};
use campus_routes::RouteRegistry;

/// One selectable destination, possibly with nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationNode {
    pub path: RoutePath,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub allowed_roles: RoleSet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationNode>,
}

impl NavigationNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A labelled group of items (sidebar section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationCategory {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub allowed_roles: RoleSet,
    pub items: Vec<NavigationNode>,
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub path: String,
    pub label: String,
}

/// The full, unfiltered navigation tree.
#[derive(Debug, Clone)]
pub struct NavigationTree {
    pub(crate) categories: Vec<NavigationCategory>,
    pub(crate) homes: HashMap<Role, Crumb>,
}

impl NavigationTree {
    /// Resolve declarations against the registry.
    pub fn bind(registry: &RouteRegistry, sections: Vec<NavSection>) -> ConfigResult<Self> {
        let categories = sections
            .into_iter()
            .map(|section| section.bind(registry))
            .collect::<ConfigResult<Vec<_>>>()?;

        let homes = Role::ALL
            .into_iter()
            .map(|role| {
                let route = registry.default_route(role);
                let crumb = Crumb {
                    path: route.path.to_string(),
                    label: route.title.clone(),
                };
                (role, crumb)
            })
            .collect();

        Ok(Self { categories, homes })
    }

    pub fn categories(&self) -> &[NavigationCategory] {
        &self.categories
    }

    /// Home entry for a role: its default landing route.
    pub fn home(&self, role: Role) -> &Crumb {
        &self.homes[&role]
    }
}

/// Declaration of a navigation section.
#[derive(Debug, Clone)]
pub struct NavSection {
    label: String,
    icon: Option<String>,
    audience: Option<RoleSet>,
    entries: Vec<NavEntry>,
}

impl NavSection {
    pub fn new(label: &str, icon: &str, entries: Vec<NavEntry>) -> Self {
        Self {
            label: label.to_string(),
            icon: Some(icon.to_string()),
            audience: None,
            entries,
        }
    }

    /// Only show this section to `roles`, whatever its items allow.
    pub fn only_for(mut self, roles: &[Role]) -> Self {
        self.audience = Some(RoleSet::of(roles));
        self
    }

    fn bind(self, registry: &RouteRegistry) -> ConfigResult<NavigationCategory> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyNavigationCategory(self.label));
        }

        let items = self
            .entries
            .into_iter()
            .map(|entry| entry.bind(registry))
            .collect::<ConfigResult<Vec<_>>>()?;

        let reachable = items
            .iter()
            .fold(RoleSet::empty(), |acc, item| acc.union(item.allowed_roles));

        Ok(NavigationCategory {
            label: self.label,
            icon: self.icon,
            allowed_roles: match self.audience {
                Some(audience) => audience.intersection(reachable),
                None => reachable,
            },
            items,
        })
    }
}

/// Declaration of a navigation item.
#[derive(Debug, Clone)]
pub struct NavEntry {
    path: String,
    label: Option<String>,
    icon: Option<String>,
    children: Vec<NavEntry>,
}

impl NavEntry {
    /// An item labelled with its route's title.
    pub fn item(path: &str) -> Self {
        Self {
            path: path.to_string(),
            label: None,
            icon: None,
            children: Vec::new(),
        }
    }

    pub fn labelled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn children(mut self, children: Vec<NavEntry>) -> Self {
        self.children = children;
        self
    }

    fn bind(self, registry: &RouteRegistry) -> ConfigResult<NavigationNode> {
        let label_for_error = self.label.clone().unwrap_or_else(|| self.path.clone());

        let route = registry
            .get(&self.path)
            .ok_or_else(|| ConfigError::UnregisteredNavigationPath {
                label: label_for_error.clone(),
                path: self.path.clone(),
            })?;
        if route.is_guest_only() {
            return Err(ConfigError::GuestNavigationPath {
                label: label_for_error,
                path: self.path,
            });
        }

        let children = self
            .children
            .into_iter()
            .map(|child| child.bind(registry))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(NavigationNode {
            path: route.path.clone(),
            label: self.label.unwrap_or_else(|| route.title.clone()),
            icon: self.icon,
            allowed_roles: route.visible_to(),
            children,
        })
    }
}
