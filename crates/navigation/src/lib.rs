//! `campus-navigation`: role-filtered navigation and breadcrumbs.
//!
//! Everything here is a pure derivation from static data; results are plain
//! values handed to the rendering layer.

pub mod breadcrumb;
pub mod catalog;
pub mod filter;
pub mod tree;

pub use breadcrumb::{Breadcrumb, derive as derive_breadcrumb};
pub use filter::{FilteredNavigation, filter_for_role};
pub use tree::{Crumb, NavEntry, NavSection, NavigationCategory, NavigationNode, NavigationTree};
