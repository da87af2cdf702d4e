//! `campus-client`: client-side session ownership and route guard.
//!
//! Framework-agnostic: the application shell feeds path changes and session
//! events in, and acts on the returned effects (render, suspend, navigate).

pub mod guard;
pub mod session;
pub mod shell;

pub use guard::{ClientGuard, GuardEffect};
pub use session::{Attempt, SessionManager, SessionState};
pub use shell::{PortalShell, RestoreFailure};
