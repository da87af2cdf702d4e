//! Application shell wiring: one session, one guard, derived navigation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use campus_auth::{Session, SessionResolver, TokenError};
use campus_navigation::{Breadcrumb, FilteredNavigation, NavigationTree, derive_breadcrumb, filter_for_role};
use campus_routes::AccessPolicy;

use crate::guard::{ClientGuard, GuardEffect};
use crate::session::{Attempt, SessionManager};

/// A stored token did not yield a session.
///
/// The guard has already re-checked the current view; `effect` carries what
/// the shell must do about it (typically a navigation to login).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session restore failed: {error}")]
pub struct RestoreFailure {
    pub error: TokenError,
    pub effect: Option<GuardEffect>,
}

/// Client-side portal state handed to the rendering layer.
///
/// The filtered navigation is recomputed whenever the role changes and is
/// dropped when the session ends; the breadcrumb is derived per path.
pub struct PortalShell {
    session: SessionManager,
    guard: ClientGuard,
    tree: Arc<NavigationTree>,
    navigation: Option<FilteredNavigation>,
    rendered: Option<String>,
}

impl PortalShell {
    pub fn new(policy: AccessPolicy, tree: Arc<NavigationTree>, resolver: Arc<dyn SessionResolver>) -> Self {
        Self {
            session: SessionManager::new(resolver),
            guard: ClientGuard::new(policy),
            tree,
            navigation: None,
            rendered: None,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Role-filtered navigation, once a session is active.
    pub fn navigation(&self) -> Option<&FilteredNavigation> {
        self.navigation.as_ref()
    }

    /// Path of the view currently rendered.
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    /// Breadcrumb for the rendered view.
    pub fn breadcrumb(&self) -> Option<Breadcrumb> {
        let navigation = self.navigation.as_ref()?;
        let path = self.rendered.as_deref()?;
        Some(derive_breadcrumb(navigation, path))
    }

    /// Validate a stored token at startup (or after a renewal).
    pub fn restore(&mut self, token: &str, now: DateTime<Utc>) -> Result<Option<GuardEffect>, RestoreFailure> {
        let result = self.session.establish(token, now).map(|_| ());
        let effect = self.session_changed();
        match result {
            Ok(()) => Ok(effect),
            Err(error) => Err(RestoreFailure { error, effect }),
        }
    }

    /// Mark the session as establishing (token present, validation in flight).
    pub fn begin_restore(&mut self) -> Attempt {
        self.session.begin()
    }

    /// Apply the result of an in-flight validation started with `begin_restore`.
    pub fn finish_restore(
        &mut self,
        attempt: Attempt,
        result: Result<Session, TokenError>,
    ) -> Option<GuardEffect> {
        if !self.session.settle(attempt, result) {
            return None;
        }
        self.session_changed()
    }

    /// Client-side path change.
    pub fn navigate(&mut self, path: &str) -> GuardEffect {
        let effect = self.guard.on_navigate(path, &self.session);
        self.track(&effect);
        effect
    }

    pub fn logout(&mut self) -> Option<GuardEffect> {
        self.session.logout();
        self.session_changed()
    }

    /// Periodic expiry check; a lapsed token ends the session.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<GuardEffect> {
        match self.session.revalidate(now) {
            Ok(()) => None,
            Err(_) => self.session_changed(),
        }
    }

    fn session_changed(&mut self) -> Option<GuardEffect> {
        self.sync_navigation();
        let effect = self.guard.on_session_change(&self.session)?;
        self.track(&effect);
        Some(effect)
    }

    fn sync_navigation(&mut self) {
        match self.session.role() {
            Some(role) if self.navigation.as_ref().map(|n| n.role) != Some(role) => {
                self.navigation = Some(filter_for_role(&self.tree, role));
            }
            Some(_) => {}
            None => self.navigation = None,
        }
    }

    fn track(&mut self, effect: &GuardEffect) {
        match effect {
            GuardEffect::Render { path } => self.rendered = Some(path.clone()),
            GuardEffect::Suspend | GuardEffect::Navigate(_) => self.rendered = None,
            GuardEffect::Unchanged => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use campus_auth::{ClaimsSessionResolver, Role};
    use campus_core::UserId;
    use campus_navigation::catalog::navigation_tree_for;
    use campus_routes::catalog::route_registry;
    use chrono::Duration;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::json;

    use super::*;

    fn shell() -> PortalShell {
        let registry = Arc::new(route_registry().unwrap());
        let tree = Arc::new(navigation_tree_for(&registry).unwrap());
        PortalShell::new(AccessPolicy::new(registry), tree, Arc::new(ClaimsSessionResolver))
    }

    fn mint(role: &str, exp: i64) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": "u-9", "role": role, "name": "Sam", "exp": exp }),
            &EncodingKey::from_secret(b"shell"),
        )
        .unwrap()
    }

    #[test]
    fn restore_builds_navigation_for_role() {
        let mut shell = shell();
        let now = Utc::now();
        let token = mint("teacher", (now + Duration::minutes(30)).timestamp());

        shell.restore(&token, now).unwrap();
        assert_eq!(shell.navigation().unwrap().role, Role::Teacher);

        assert!(matches!(shell.navigate("/dashboard/grades/entry"), GuardEffect::Render { .. }));
        let crumbs = shell.breadcrumb().unwrap();
        assert_eq!(crumbs.current().path, "/dashboard/grades/entry");
    }

    #[test]
    fn suspended_navigation_renders_after_validation() {
        let mut shell = shell();
        let attempt = shell.begin_restore();
        assert_eq!(shell.navigate("/dashboard/reports"), GuardEffect::Suspend);
        assert_eq!(shell.rendered(), None);
        assert!(shell.navigation().is_none());

        let effect = shell.finish_restore(
            attempt,
            Ok(Session::new("t", Role::DepartmentHead, UserId::new("d"), "D")),
        );
        assert_eq!(
            effect,
            Some(GuardEffect::Render {
                path: "/dashboard/reports".to_string()
            })
        );
        assert_eq!(shell.rendered(), Some("/dashboard/reports"));
        assert_eq!(shell.navigation().unwrap().role, Role::DepartmentHead);
    }

    #[test]
    fn logout_clears_navigation_and_redirects() {
        let mut shell = shell();
        let now = Utc::now();
        shell
            .restore(&mint("admin", (now + Duration::minutes(30)).timestamp()), now)
            .unwrap();
        shell.navigate("/dashboard/settings");

        let effect = shell.logout();
        assert!(matches!(effect, Some(GuardEffect::Navigate(ref r)) if r.target == "/login"));
        assert!(shell.navigation().is_none());
        assert!(shell.breadcrumb().is_none());
    }

    #[test]
    fn expiry_tick_ends_session() {
        let mut shell = shell();
        let now = Utc::now();
        shell
            .restore(&mint("student", (now + Duration::minutes(1)).timestamp()), now)
            .unwrap();
        shell.navigate("/dashboard/courses");

        assert_eq!(shell.tick(now), None);
        let effect = shell.tick(now + Duration::minutes(5));
        assert!(matches!(effect, Some(GuardEffect::Navigate(_))));
        assert!(shell.session().session().is_none());
    }

    #[test]
    fn restore_with_bad_token_reports_error() {
        let mut shell = shell();
        assert_eq!(shell.restore("garbage", Utc::now()).unwrap_err().error, TokenError::Malformed);
        assert!(shell.navigation().is_none());
    }

    #[test]
    fn failed_restore_over_rendered_view_navigates_to_login() {
        let mut shell = shell();
        let now = Utc::now();
        shell
            .restore(&mint("admin", (now + Duration::minutes(30)).timestamp()), now)
            .unwrap();
        assert!(matches!(shell.navigate("/dashboard/settings"), GuardEffect::Render { .. }));

        let failure = shell.restore("garbage", now).unwrap_err();
        assert_eq!(failure.error, TokenError::Malformed);
        let Some(GuardEffect::Navigate(redirect)) = failure.effect else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.target, "/login");
        assert_eq!(redirect.return_to.as_deref(), Some("/dashboard/settings"));
        assert_eq!(shell.rendered(), None);

        // Coming back to the view without a session redirects again.
        assert!(matches!(shell.navigate("/dashboard/settings"), GuardEffect::Navigate(_)));
    }
}
