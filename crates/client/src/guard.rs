//! Client guard: re-applies the access policy on every in-app navigation.
//!
//! The edge gate only sees full page loads. In-app link clicks never reach it,
//! so the client re-checks each path change against the same policy and the
//! same registry before the target view is rendered.

use campus_auth::Role;
use campus_core::normalize;
use campus_routes::{AccessPolicy, Decision, Redirect};

use crate::session::SessionManager;

/// What the application shell should do for a path change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEffect {
    /// Render the requested view.
    Render { path: String },
    /// Keep the guarded subtree behind a neutral loading state.
    Suspend,
    /// Abort the requested view and navigate client-side instead.
    Navigate(Redirect),
    /// Nothing changed since the last evaluation.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Evaluated {
    path: String,
    role: Option<Role>,
}

/// A requested location: canonical path plus the query it came with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Requested {
    path: String,
    query: Option<String>,
}

impl Requested {
    fn parse(raw: &str) -> Self {
        let without_fragment = raw.split('#').next().unwrap_or_default();
        let query = without_fragment
            .split_once('?')
            .map(|(_, q)| q)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Self {
            path: normalize(raw),
            query,
        }
    }
}

/// Per-application guard state.
#[derive(Debug, Clone)]
pub struct ClientGuard {
    policy: AccessPolicy,
    last: Option<Evaluated>,
    last_query: Option<String>,
    pending: Option<Requested>,
}

impl ClientGuard {
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy,
            last: None,
            last_query: None,
            pending: None,
        }
    }

    /// Path waiting for the session to settle, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|r| r.path.as_str())
    }

    /// Path most recently rendered against a settled session.
    pub fn current(&self) -> Option<&str> {
        self.last.as_ref().map(|e| e.path.as_str())
    }

    /// Evaluate a client-side path change.
    pub fn on_navigate(&mut self, path: &str, session: &SessionManager) -> GuardEffect {
        let requested = Requested::parse(path);

        if session.is_establishing() {
            if self.pending.as_ref() == Some(&requested) {
                return GuardEffect::Unchanged;
            }
            if let Some(previous) = self.pending.replace(requested) {
                tracing::debug!(previous = %previous.path, "pending navigation superseded");
            }
            return GuardEffect::Suspend;
        }

        self.pending = None;
        self.evaluate(requested, session.role())
    }

    /// Re-run after the session settled, logged out or was invalidated.
    ///
    /// A suspended navigation resolves here; otherwise the current path is
    /// re-checked against the new role. Returns `None` while the session is
    /// still establishing or when there is nothing to re-check.
    pub fn on_session_change(&mut self, session: &SessionManager) -> Option<GuardEffect> {
        if session.is_establishing() {
            return None;
        }

        let requested = match self.pending.take() {
            Some(requested) => requested,
            None => Requested {
                path: self.last.as_ref()?.path.clone(),
                query: self.last_query.clone(),
            },
        };
        Some(self.evaluate(requested, session.role()))
    }

    /// Only rendered outcomes are remembered: a redirect the shell did not
    /// follow is issued again on the next evaluation.
    fn evaluate(&mut self, requested: Requested, role: Option<Role>) -> GuardEffect {
        let key = Evaluated {
            path: requested.path,
            role,
        };
        if self.last.as_ref() == Some(&key) {
            return GuardEffect::Unchanged;
        }

        let decision = self.policy.decide(&key.path, role);
        match self.policy.redirect_for(&decision) {
            None => {
                let effect = GuardEffect::Render {
                    path: key.path.clone(),
                };
                self.last = Some(key);
                self.last_query = requested.query;
                effect
            }
            Some(mut redirect) => {
                if let (Some(back), Some(query)) = (redirect.return_to.as_mut(), requested.query) {
                    back.push('?');
                    back.push_str(&query);
                }
                tracing::debug!(
                    path = %key.path,
                    target = %redirect.target,
                    role = role.map(|r| r.as_str()).unwrap_or("none"),
                    login = matches!(decision, Decision::RedirectToLogin { .. }),
                    "client guard redirect"
                );
                GuardEffect::Navigate(redirect)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use campus_auth::{ClaimsSessionResolver, Session, TokenError};
    use campus_core::UserId;
    use campus_routes::catalog::route_registry;

    use super::*;

    fn guard() -> ClientGuard {
        ClientGuard::new(AccessPolicy::new(Arc::new(route_registry().unwrap())))
    }

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(ClaimsSessionResolver))
    }

    fn signed_in(role: Role) -> SessionManager {
        let mut manager = manager();
        let attempt = manager.begin();
        manager.settle(attempt, Ok(Session::new("t", role, UserId::new("u"), "U")));
        manager
    }

    #[test]
    fn allowed_path_renders() {
        let mut guard = guard();
        let session = signed_in(Role::Teacher);
        assert_eq!(
            guard.on_navigate("/dashboard/classes", &session),
            GuardEffect::Render {
                path: "/dashboard/classes".to_string()
            }
        );
    }

    #[test]
    fn forbidden_path_navigates_to_role_default() {
        let mut guard = guard();
        let session = signed_in(Role::Student);
        let GuardEffect::Navigate(redirect) = guard.on_navigate("/dashboard/users", &session) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.target, "/dashboard/courses");

        // Following the redirect renders, no loop.
        assert!(matches!(
            guard.on_navigate(&redirect.target, &session),
            GuardEffect::Render { .. }
        ));
    }

    #[test]
    fn anonymous_navigation_goes_to_login() {
        let mut guard = guard();
        let session = manager();
        let GuardEffect::Navigate(redirect) = guard.on_navigate("/dashboard/grades", &session) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.target, "/login");
        assert_eq!(redirect.return_to.as_deref(), Some("/dashboard/grades"));
    }

    #[test]
    fn rerun_with_same_path_and_role_is_noop() {
        let mut guard = guard();
        let session = signed_in(Role::Admin);
        assert!(matches!(guard.on_navigate("/dashboard", &session), GuardEffect::Render { .. }));
        assert_eq!(guard.on_navigate("/dashboard", &session), GuardEffect::Unchanged);
        assert_eq!(guard.on_navigate("/dashboard/", &session), GuardEffect::Unchanged);
    }

    #[test]
    fn establishing_session_suspends_rendering() {
        let mut guard = guard();
        let mut session = manager();
        let attempt = session.begin();

        assert_eq!(guard.on_navigate("/dashboard/users", &session), GuardEffect::Suspend);
        assert_eq!(guard.on_navigate("/dashboard/users", &session), GuardEffect::Unchanged);
        assert_eq!(guard.on_session_change(&session), None);

        session.settle(attempt, Ok(Session::new("t", Role::Admin, UserId::new("a"), "A")));
        assert_eq!(
            guard.on_session_change(&session),
            Some(GuardEffect::Render {
                path: "/dashboard/users".to_string()
            })
        );
        assert_eq!(guard.pending(), None);
    }

    #[test]
    fn newer_navigation_replaces_pending_one() {
        let mut guard = guard();
        let mut session = manager();
        let attempt = session.begin();

        assert_eq!(guard.on_navigate("/dashboard/users", &session), GuardEffect::Suspend);
        assert_eq!(guard.on_navigate("/dashboard/courses", &session), GuardEffect::Suspend);
        assert_eq!(guard.pending(), Some("/dashboard/courses"));

        session.settle(attempt, Ok(Session::new("t", Role::Student, UserId::new("s"), "S")));
        assert_eq!(
            guard.on_session_change(&session),
            Some(GuardEffect::Render {
                path: "/dashboard/courses".to_string()
            })
        );
    }

    #[test]
    fn failed_establishment_redirects_pending_path_to_login() {
        let mut guard = guard();
        let mut session = manager();
        let attempt = session.begin();

        guard.on_navigate("/dashboard", &session);
        session.settle(attempt, Err(TokenError::Expired));

        let Some(GuardEffect::Navigate(redirect)) = guard.on_session_change(&session) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.target, "/login");
        assert_eq!(redirect.return_to.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn logout_rechecks_current_path() {
        let mut guard = guard();
        let mut session = signed_in(Role::Teacher);
        guard.on_navigate("/dashboard/grades/entry", &session);

        session.logout();
        let Some(GuardEffect::Navigate(redirect)) = guard.on_session_change(&session) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.target, "/login");
        assert_eq!(guard.current(), Some("/dashboard/grades/entry"));
    }

    #[test]
    fn login_redirect_keeps_query() {
        let mut guard = guard();
        let session = manager();
        let GuardEffect::Navigate(redirect) = guard.on_navigate("/dashboard/grades?term=2#top", &session) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.return_to.as_deref(), Some("/dashboard/grades?term=2"));
    }

    #[test]
    fn logout_redirect_keeps_rendered_query() {
        let mut guard = guard();
        let mut session = signed_in(Role::Teacher);
        guard.on_navigate("/dashboard/attendance?week=4", &session);

        session.logout();
        let Some(GuardEffect::Navigate(redirect)) = guard.on_session_change(&session) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.return_to.as_deref(), Some("/dashboard/attendance?week=4"));
    }

    #[test]
    fn unfollowed_redirect_is_issued_again() {
        let mut guard = guard();
        let session = signed_in(Role::Student);
        for _ in 0..2 {
            assert!(matches!(
                guard.on_navigate("/dashboard/settings", &session),
                GuardEffect::Navigate(_)
            ));
        }
    }

    #[test]
    fn signed_in_user_leaves_login_page() {
        let mut guard = guard();
        let session = signed_in(Role::DepartmentHead);
        let GuardEffect::Navigate(redirect) = guard.on_navigate("/login", &session) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.target, "/dashboard/faculty");
    }
}
