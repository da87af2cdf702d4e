use std::sync::Arc;

use campus_core::ConfigResult;
use campus_navigation::NavigationTree;
use campus_routes::{AccessPolicy, RouteRegistry};

/// Read-only portal data shared by every request.
#[derive(Debug, Clone)]
pub struct PortalServices {
    pub policy: AccessPolicy,
    pub navigation: Arc<NavigationTree>,
}

impl PortalServices {
    /// Load and validate the compiled-in route registry and navigation tree.
    pub fn load() -> ConfigResult<Self> {
        let registry = campus_routes::catalog::route_registry()?;
        let navigation = campus_navigation::catalog::navigation_tree_for(&registry)?;
        tracing::info!(
            routes = registry.routes().count(),
            sections = navigation.categories().len(),
            "portal catalog loaded"
        );
        Ok(Self::new(Arc::new(registry), Arc::new(navigation)))
    }

    pub fn new(registry: Arc<RouteRegistry>, navigation: Arc<NavigationTree>) -> Self {
        Self {
            policy: AccessPolicy::new(registry),
            navigation,
        }
    }

    pub fn registry(&self) -> &RouteRegistry {
        self.policy.registry()
    }
}
