//! Route registry: the single table mapping a route key to who may reach it.

use std::collections::HashMap;

use serde::Serialize;

use campus_auth::{Role, RoleSet};
use campus_core::{ConfigError, ConfigResult, RoutePath, ancestors, normalize};

/// Who may reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum Audience {
    /// Anyone, with or without a session.
    Public,
    /// Only visitors without a session (the login page).
    Guest,
    /// Only sessions whose role is in the set.
    Roles(RoleSet),
}

/// Metadata for one registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub path: RoutePath,
    pub title: String,
    pub description: String,
    pub audience: Audience,
}

impl RouteDescriptor {
    pub fn public(path: &str, title: &str, description: &str) -> ConfigResult<Self> {
        Self::new(path, title, description, Audience::Public)
    }

    pub fn guest(path: &str, title: &str, description: &str) -> ConfigResult<Self> {
        Self::new(path, title, description, Audience::Guest)
    }

    pub fn protected(path: &str, title: &str, description: &str, roles: &[Role]) -> ConfigResult<Self> {
        Self::new(path, title, description, Audience::Roles(RoleSet::of(roles)))
    }

    fn new(path: &str, title: &str, description: &str, audience: Audience) -> ConfigResult<Self> {
        Ok(Self {
            path: RoutePath::parse(path)?,
            title: title.to_string(),
            description: description.to_string(),
            audience,
        })
    }

    pub fn is_public(&self) -> bool {
        matches!(self.audience, Audience::Public)
    }

    pub fn is_guest_only(&self) -> bool {
        matches!(self.audience, Audience::Guest)
    }

    /// Roles checked for protected routes; empty for public and guest routes,
    /// which bypass role checks.
    pub fn allowed_roles(&self) -> RoleSet {
        match self.audience {
            Audience::Roles(roles) => roles,
            Audience::Public | Audience::Guest => RoleSet::empty(),
        }
    }

    /// Roles for which this page is visible once signed in.
    pub fn visible_to(&self) -> RoleSet {
        match self.audience {
            Audience::Public => RoleSet::all(),
            Audience::Guest => RoleSet::empty(),
            Audience::Roles(roles) => roles,
        }
    }
}

/// Validated, immutable route table.
///
/// Built once at startup through [`RouteRegistryBuilder`]; a registry that
/// exists has passed every configuration check.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    routes: Vec<RouteDescriptor>,
    index: HashMap<String, usize>,
    login: usize,
    defaults: HashMap<Role, usize>,
}

impl RouteRegistry {
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    /// Exact lookup by canonical key.
    pub fn get(&self, path: &str) -> Option<&RouteDescriptor> {
        self.index.get(path).map(|&i| &self.routes[i])
    }

    /// Longest registered segment prefix of `path` (after normalisation).
    ///
    /// `None` means the path is unregistered; callers must treat that as
    /// protected.
    pub fn lookup(&self, path: &str) -> Option<&RouteDescriptor> {
        let path = normalize(path);
        ancestors(&path).find_map(|candidate| self.get(candidate))
    }

    pub fn login(&self) -> &RouteDescriptor {
        &self.routes[self.login]
    }

    pub fn is_login(&self, path: &str) -> bool {
        self.login().path.as_str() == normalize(path)
    }

    /// Landing route for a role.
    pub fn default_route(&self, role: Role) -> &RouteDescriptor {
        // Every role has an entry; `build` refuses registries without one.
        &self.routes[self.defaults[&role]]
    }

    /// All descriptors, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter()
    }

    /// Registered routes a signed-in role may reach.
    pub fn reachable_by(&self, role: Role) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().filter(move |d| d.visible_to().contains(role))
    }
}

#[derive(Debug, Default)]
pub struct RouteRegistryBuilder {
    routes: Vec<RouteDescriptor>,
    login: Option<String>,
    defaults: Vec<(Role, String)>,
}

impl RouteRegistryBuilder {
    pub fn route(mut self, descriptor: RouteDescriptor) -> Self {
        self.routes.push(descriptor);
        self
    }

    pub fn login(mut self, path: &str) -> Self {
        self.login = Some(path.to_string());
        self
    }

    pub fn default_route(mut self, role: Role, path: &str) -> Self {
        self.defaults.push((role, path.to_string()));
        self
    }

    /// Validate and freeze the table.
    pub fn build(self) -> ConfigResult<RouteRegistry> {
        let mut index = HashMap::with_capacity(self.routes.len());
        for (i, route) in self.routes.iter().enumerate() {
            if let Audience::Roles(roles) = route.audience {
                if roles.is_empty() {
                    return Err(ConfigError::EmptyAllowedRoles(route.path.to_string()));
                }
            }
            if index.insert(route.path.to_string(), i).is_some() {
                return Err(ConfigError::DuplicateRoute(route.path.to_string()));
            }
        }

        let login_path = self.login.ok_or(ConfigError::MissingLoginRoute)?;
        let login = *index.get(&login_path).ok_or(ConfigError::MissingLoginRoute)?;
        if !self.routes[login].is_guest_only() {
            return Err(ConfigError::LoginRouteNotGuest(login_path));
        }

        let mut defaults = HashMap::new();
        for (role, path) in self.defaults {
            let i = *index
                .get(&path)
                .ok_or_else(|| ConfigError::UnregisteredDefaultRoute {
                    role: role.to_string(),
                    path: path.clone(),
                })?;
            if !self.routes[i].visible_to().contains(role) {
                return Err(ConfigError::DefaultRouteNotPermitted {
                    role: role.to_string(),
                    path,
                });
            }
            if defaults.insert(role, i).is_some() {
                return Err(ConfigError::DuplicateDefaultRoute(role.to_string()));
            }
        }
        for role in Role::ALL {
            if !defaults.contains_key(&role) {
                return Err(ConfigError::MissingDefaultRoute(role.to_string()));
            }
        }

        tracing::debug!(routes = self.routes.len(), "route registry validated");

        Ok(RouteRegistry {
            routes: self.routes,
            index,
            login,
            defaults,
        })
    }
}
