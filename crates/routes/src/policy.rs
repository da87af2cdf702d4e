//! Access policy: `(path, role | none) -> Decision`.
//!
//! Both the edge gate and the client guard call into this module so their
//! answers cannot drift apart.

use std::sync::Arc;

use serde::Serialize;

use campus_auth::{Role, RoleSet, TokenError};
use campus_core::normalize;

use crate::registry::{Audience, RouteDescriptor, RouteRegistry};

/// Outcome of an access decision. Total: there is no "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    /// No session; send the visitor to login and bring them back afterwards.
    RedirectToLogin { return_to: String },
    /// Session present but not admitted; send it to the role's landing route.
    RedirectToRoleDefault { role: Role },
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Why a request was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    TokenMissing,
    TokenMalformed,
    TokenExpired,
    RouteUnregistered,
    RoleNotPermitted,
    /// A signed-in session asked for a guest-only page (the login page).
    SessionActive,
}

impl From<TokenError> for Denial {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Missing => Denial::TokenMissing,
            TokenError::Malformed => Denial::TokenMalformed,
            TokenError::Expired => Denial::TokenExpired,
        }
    }
}

/// A concrete redirect: where to go, and where to come back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
}

/// Access policy over a shared, immutable route registry.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    registry: Arc<RouteRegistry>,
}

impl AccessPolicy {
    pub fn new(registry: Arc<RouteRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Decide whether `role` (or an anonymous visitor) may reach `path`.
    ///
    /// - No IO
    /// - No panics
    /// - No hidden state (same inputs, same output)
    pub fn decide(&self, path: &str, role: Option<Role>) -> Decision {
        self.evaluate(path, role).0
    }

    /// Decision plus the denial reason, if any.
    pub fn evaluate(&self, path: &str, role: Option<Role>) -> (Decision, Option<Denial>) {
        let path = normalize(path);
        let matched = self.registry.lookup(&path);

        match (matched.map(|d| d.audience), role) {
            (Some(Audience::Public), _) => (Decision::Allow, None),
            (Some(Audience::Guest), None) => (Decision::Allow, None),
            (Some(Audience::Guest), Some(role)) => (
                Decision::RedirectToRoleDefault { role },
                Some(Denial::SessionActive),
            ),
            (_, None) => (
                Decision::RedirectToLogin { return_to: path },
                Some(Denial::TokenMissing),
            ),
            (Some(Audience::Roles(allowed)), Some(role)) => {
                if allowed.contains(role) {
                    (Decision::Allow, None)
                } else {
                    (
                        Decision::RedirectToRoleDefault { role },
                        Some(Denial::RoleNotPermitted),
                    )
                }
            }
            (None, Some(role)) => (
                Decision::RedirectToRoleDefault { role },
                Some(Denial::RouteUnregistered),
            ),
        }
    }

    /// Resolve a decision into a concrete redirect, `None` for `Allow`.
    ///
    /// The return path is dropped when it would bring the visitor straight
    /// back to the login page or leave the portal's origin.
    pub fn redirect_for(&self, decision: &Decision) -> Option<Redirect> {
        match decision {
            Decision::Allow => None,
            Decision::RedirectToLogin { return_to } => Some(Redirect {
                target: self.registry.login().path.to_string(),
                return_to: self.safe_return_path(return_to),
            }),
            Decision::RedirectToRoleDefault { role } => Some(Redirect {
                target: self.registry.default_route(*role).path.to_string(),
                return_to: None,
            }),
        }
    }

    fn safe_return_path(&self, path: &str) -> Option<String> {
        if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
            return None;
        }
        if self.registry.is_login(path) {
            return None;
        }
        Some(path.to_string())
    }

    /// Explain a decision for audit and debugging.
    pub fn explain(&self, path: &str, role: Option<Role>) -> AccessExplanation {
        let normalized = normalize(path);
        let matched = self.registry.lookup(&normalized);
        let (decision, denial) = self.evaluate(&normalized, role);
        let redirect = self.redirect_for(&decision);

        let reason = match (&decision, denial) {
            (Decision::Allow, _) => match matched {
                Some(d) if d.is_public() => format!("'{}' is public", d.path),
                Some(d) if d.is_guest_only() => format!("'{}' is open to visitors without a session", d.path),
                Some(d) => format!(
                    "role '{}' is allowed on '{}'",
                    role.map(|r| r.as_str()).unwrap_or("none"),
                    d.path
                ),
                None => "allowed".to_string(),
            },
            (_, Some(Denial::TokenMissing)) => "no valid session; sign-in required".to_string(),
            (_, Some(Denial::RouteUnregistered)) => {
                format!("'{normalized}' is not registered; unregistered paths are protected")
            }
            (_, Some(Denial::RoleNotPermitted)) => format!(
                "role '{}' is not among the allowed roles",
                role.map(|r| r.as_str()).unwrap_or("none")
            ),
            (_, Some(Denial::SessionActive)) => "already signed in; guest-only page".to_string(),
            (_, _) => "denied".to_string(),
        };

        AccessExplanation {
            path: normalized,
            role,
            matched_route: matched.map(|d| d.path.to_string()),
            allowed_roles: matched.map(RouteDescriptor::allowed_roles).unwrap_or_default(),
            decision,
            denial,
            redirect,
            reason,
        }
    }
}

/// Auditable account of one access decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub path: String,
    pub role: Option<Role>,
    pub matched_route: Option<String>,
    pub allowed_roles: RoleSet,
    pub decision: Decision,
    pub denial: Option<Denial>,
    pub redirect: Option<Redirect>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(Arc::new(catalog::route_registry().unwrap()))
    }

    #[test]
    fn student_on_user_management_goes_to_courses() {
        let policy = policy();
        let decision = policy.decide("/dashboard/users", Some(Role::Student));
        assert_eq!(decision, Decision::RedirectToRoleDefault { role: Role::Student });

        let redirect = policy.redirect_for(&decision).unwrap();
        assert_eq!(redirect.target, "/dashboard/courses");
        assert_eq!(redirect.return_to, None);
    }

    #[test]
    fn anonymous_visitor_is_sent_to_login_with_return_path() {
        let policy = policy();
        let decision = policy.decide("/dashboard", None);
        assert_eq!(
            decision,
            Decision::RedirectToLogin {
                return_to: "/dashboard".to_string()
            }
        );
        let redirect = policy.redirect_for(&decision).unwrap();
        assert_eq!(redirect.target, "/login");
        assert_eq!(redirect.return_to.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn signed_in_admin_on_login_goes_home() {
        let policy = policy();
        assert_eq!(
            policy.decide("/login", Some(Role::Admin)),
            Decision::RedirectToRoleDefault { role: Role::Admin }
        );
        assert_eq!(policy.decide("/login", None), Decision::Allow);
    }

    #[test]
    fn unregistered_paths_fail_closed() {
        let policy = policy();
        let (decision, denial) = policy.evaluate("/totally/unknown", Some(Role::Admin));
        assert_eq!(decision, Decision::RedirectToRoleDefault { role: Role::Admin });
        assert_eq!(denial, Some(Denial::RouteUnregistered));

        let decision = policy.decide("/totally/unknown", None);
        assert!(matches!(decision, Decision::RedirectToLogin { .. }));
    }

    #[test]
    fn longest_prefix_wins() {
        let policy = policy();
        // `/dashboard` admits students, `/dashboard/users` does not.
        assert_eq!(policy.decide("/dashboard/settings-archive", Some(Role::Student)), Decision::Allow);
        assert_eq!(
            policy.decide("/dashboard/users/42", Some(Role::Student)),
            Decision::RedirectToRoleDefault { role: Role::Student }
        );
        assert_eq!(policy.decide("/dashboard/users/42", Some(Role::DepartmentHead)), Decision::Allow);
    }

    #[test]
    fn login_return_path_is_not_kept() {
        let policy = policy();
        let redirect = policy
            .redirect_for(&Decision::RedirectToLogin {
                return_to: "/login".to_string(),
            })
            .unwrap();
        assert_eq!(redirect.return_to, None);

        let redirect = policy
            .redirect_for(&Decision::RedirectToLogin {
                return_to: "//evil.example".to_string(),
            })
            .unwrap();
        assert_eq!(redirect.return_to, None);
    }

    #[test]
    fn explanation_names_the_matched_route() {
        let policy = policy();
        let explanation = policy.explain("/dashboard/users/42", Some(Role::Teacher));
        assert_eq!(explanation.matched_route.as_deref(), Some("/dashboard/users"));
        assert_eq!(explanation.denial, Some(Denial::RoleNotPermitted));
        assert!(explanation.allowed_roles.contains(Role::Admin));
        assert_eq!(explanation.redirect.unwrap().target, "/dashboard/classes");

        let explanation = policy.explain("/forgot-password", None);
        assert!(explanation.decision.is_allow());
        assert!(explanation.reason.contains("public"));
    }

    #[test]
    fn token_errors_map_to_denials() {
        assert_eq!(Denial::from(TokenError::Expired), Denial::TokenExpired);
        assert_eq!(Denial::from(TokenError::Malformed), Denial::TokenMalformed);
        assert_eq!(Denial::from(TokenError::Missing), Denial::TokenMissing);
    }

    #[test]
    fn explanation_serializes_for_audit() {
        let explanation = policy().explain("/dashboard/users/42", Some(Role::Student));
        let value = serde_json::to_value(&explanation).unwrap();

        assert_eq!(value["matched_route"], "/dashboard/users");
        assert_eq!(value["denial"], "role_not_permitted");
        assert_eq!(
            value["decision"],
            serde_json::json!({ "decision": "redirect_to_role_default", "role": "student" })
        );
        assert_eq!(value["redirect"], serde_json::json!({ "target": "/dashboard/courses" }));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn role_or_none() -> impl Strategy<Value = Option<Role>> {
            prop_oneof![Just(None), proptest::sample::select(Role::ALL.to_vec()).prop_map(Some)]
        }

        fn registered_path() -> impl Strategy<Value = String> {
            let paths: Vec<String> = policy().registry().routes().map(|d| d.path.to_string()).collect();
            proptest::sample::select(paths)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: public routes admit everyone.
            #[test]
            fn public_routes_always_allow(path in registered_path(), role in role_or_none()) {
                let policy = policy();
                let descriptor = policy.registry().get(&path).unwrap().clone();
                if descriptor.is_public() {
                    prop_assert_eq!(policy.decide(&path, role), Decision::Allow);
                }
            }

            /// Property: protected routes allow exactly their allowed roles.
            #[test]
            fn protected_routes_match_allowed_roles(path in registered_path(), suffix in "(/[a-z0-9]{1,8}){0,2}") {
                let policy = policy();
                let descriptor = policy.registry().get(&path).unwrap().clone();
                let Audience::Roles(allowed) = descriptor.audience else {
                    return Ok(());
                };
                let requested = format!("{path}{suffix}");
                // A longer registered route may own the suffixed path.
                if policy.registry().lookup(&requested).map(|d| &d.path) != Some(&descriptor.path) {
                    return Ok(());
                }
                for role in Role::ALL {
                    let decision = policy.decide(&requested, Some(role));
                    prop_assert_eq!(decision.is_allow(), allowed.contains(role));
                }
            }

            /// Property: identical inputs give identical outputs.
            #[test]
            fn decide_is_idempotent(path in "(/[a-z_-]{1,10}){0,4}", role in role_or_none()) {
                let policy = policy();
                prop_assert_eq!(policy.decide(&path, role), policy.decide(&path, role));
            }

            /// Property: following a redirect with the same role lands on an allowed page.
            #[test]
            fn redirects_never_loop(path in "(/[a-z_-]{1,10}){0,4}", role in role_or_none()) {
                let policy = policy();
                let decision = policy.decide(&path, role);
                if let Some(redirect) = policy.redirect_for(&decision) {
                    prop_assert_eq!(policy.decide(&redirect.target, role), Decision::Allow);
                }
            }

            /// Property: registered paths also redirect without loops.
            #[test]
            fn registered_redirects_never_loop(path in registered_path(), role in role_or_none()) {
                let policy = policy();
                let decision = policy.decide(&path, role);
                if let Some(redirect) = policy.redirect_for(&decision) {
                    prop_assert_eq!(policy.decide(&redirect.target, role), Decision::Allow);
                }
            }
        }
    }
}
