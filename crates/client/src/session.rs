//! In-memory session ownership for the client application.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use campus_auth::{Role, Session, SessionResolver, TokenError, TokenStatus, check_token};

/// Identifies one attempt at establishing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt(u64);

/// Where the client's session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session (never signed in, logged out, or invalidated).
    Anonymous,
    /// A token is present but has not been validated yet.
    Establishing { attempt: Attempt },
    Active(Session),
}

/// Owns the single session object the guard and navigation read from.
pub struct SessionManager {
    state: SessionState,
    resolver: Arc<dyn SessionResolver>,
    attempts: u64,
}

impl SessionManager {
    pub fn new(resolver: Arc<dyn SessionResolver>) -> Self {
        Self {
            state: SessionState::Anonymous,
            resolver,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session().map(Session::role)
    }

    pub fn is_establishing(&self) -> bool {
        matches!(self.state, SessionState::Establishing { .. })
    }

    /// Start establishing a session. Any earlier attempt becomes stale.
    pub fn begin(&mut self) -> Attempt {
        self.attempts += 1;
        let attempt = Attempt(self.attempts);
        self.state = SessionState::Establishing { attempt };
        attempt
    }

    /// The one place an attempt resolves. Results for stale attempts are
    /// ignored; returns whether `result` was applied.
    pub fn settle(&mut self, attempt: Attempt, result: Result<Session, TokenError>) -> bool {
        if self.state != (SessionState::Establishing { attempt }) {
            tracing::debug!(?attempt, "ignoring stale session result");
            return false;
        }

        self.state = match result {
            Ok(session) => {
                tracing::info!(role = %session.role(), user_id = %session.user_id(), "session established");
                SessionState::Active(session)
            }
            Err(err) => {
                tracing::info!(error = %err, "session could not be established");
                SessionState::Anonymous
            }
        };
        true
    }

    /// Begin and settle in one step with the configured resolver.
    pub fn establish(&mut self, token: &str, now: DateTime<Utc>) -> Result<&Session, TokenError> {
        let attempt = self.begin();
        let result = self.resolver.resolve(token, now);
        let error = result.as_ref().err().copied();
        self.settle(attempt, result);

        match (self.session(), error) {
            (Some(session), _) => Ok(session),
            (None, Some(err)) => Err(err),
            (None, None) => Err(TokenError::Missing),
        }
    }

    /// Drop the session (user-initiated).
    pub fn logout(&mut self) {
        if self.session().is_some() {
            tracing::info!("session closed by logout");
        }
        self.state = SessionState::Anonymous;
    }

    /// Drop the session because its token stopped validating.
    pub fn invalidate(&mut self, reason: TokenError) {
        tracing::info!(reason = %reason, "session invalidated");
        self.state = SessionState::Anonymous;
    }

    /// Re-check the active token's expiry; invalidates the session when it lapsed.
    pub fn revalidate(&mut self, now: DateTime<Utc>) -> Result<(), TokenError> {
        let Some(session) = self.session() else {
            return Ok(());
        };
        match check_token(Some(session.token()), now) {
            TokenStatus::Valid(_) => Ok(()),
            status => {
                let err = status.error().unwrap_or(TokenError::Malformed);
                self.invalidate(err);
                Err(err)
            }
        }
    }
}

impl core::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}
