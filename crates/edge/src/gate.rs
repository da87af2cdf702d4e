//! Edge gate: one decision per incoming request, before anything renders.

use chrono::{DateTime, Utc};

use campus_auth::{Session, TokenStatus, check_token, renewal_is_live};
use campus_routes::{AccessPolicy, Decision, Denial, Redirect};

use crate::token_store::TokenStore;

/// What the request carries past the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Passage {
    Authenticated(Session),
    Anonymous,
    /// Access token lapsed but the renewal token is live; the client renews.
    RenewalDeferred,
}

impl Passage {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Passage::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    PassThrough(Passage),
    Redirect { redirect: Redirect, reason: Denial },
}

/// Stateless across requests; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EdgeGate {
    policy: AccessPolicy,
}

impl EdgeGate {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn evaluate(&self, path: &str, tokens: &impl TokenStore, now: DateTime<Utc>) -> GateOutcome {
        match check_token(tokens.access_token(), now) {
            TokenStatus::Valid(claims) => {
                let token = tokens.access_token().unwrap_or_default();
                let session = Session::from_claims(token, &claims);
                let (decision, denial) = self.policy.evaluate(path, Some(session.role()));
                self.resolve(decision, denial, Passage::Authenticated(session))
            }
            TokenStatus::Expired if renewal_is_live(tokens.renewal_token(), now) => {
                GateOutcome::PassThrough(Passage::RenewalDeferred)
            }
            status => {
                let (decision, denial) = self.policy.evaluate(path, None);
                // The token state explains a login redirect better than "missing".
                let denial = match (denial, status.error()) {
                    (Some(Denial::TokenMissing), Some(err)) => Some(Denial::from(err)),
                    (denial, _) => denial,
                };
                self.resolve(decision, denial, Passage::Anonymous)
            }
        }
    }

    fn resolve(&self, decision: Decision, denial: Option<Denial>, passage: Passage) -> GateOutcome {
        match self.policy.redirect_for(&decision) {
            None => GateOutcome::PassThrough(passage),
            Some(redirect) => GateOutcome::Redirect {
                redirect,
                reason: denial.unwrap_or(Denial::RouteUnregistered),
            },
        }
    }
}

/// Build the `Location` value for a redirect. The original query string
/// travels inside the return path.
pub fn location(redirect: &Redirect, query: Option<&str>, return_param: &str) -> String {
    let Some(return_to) = &redirect.return_to else {
        return redirect.target.clone();
    };

    let mut back = return_to.clone();
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        back.push('?');
        back.push_str(query);
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair(return_param, &back)
        .finish();
    format!("{}?{}", redirect.target, encoded)
}
