//! The campus portal's sidebar.

use campus_auth::Role;
use campus_core::ConfigResult;
use campus_routes::RouteRegistry;

use crate::tree::{NavEntry as E, NavSection, NavigationTree};

/// Portal navigation bound to the portal route registry.
pub fn navigation_tree() -> ConfigResult<NavigationTree> {
    let registry = campus_routes::catalog::route_registry()?;
    navigation_tree_for(&registry)
}

/// Portal navigation bound to an already loaded registry.
pub fn navigation_tree_for(registry: &RouteRegistry) -> ConfigResult<NavigationTree> {
    NavigationTree::bind(registry, sections())
}

fn sections() -> Vec<NavSection> {
    vec![
        NavSection::new(
            "Overview",
            "home",
            vec![
                E::item("/dashboard").icon("layout-dashboard"),
                E::item("/dashboard/notices").icon("megaphone"),
                E::item("/dashboard/timetable").icon("calendar"),
            ],
        ),
        NavSection::new(
            "Administration",
            "shield",
            vec![
                E::item("/dashboard/users").icon("users").children(vec![
                    E::item("/dashboard/users").labelled("All users"),
                    E::item("/dashboard/users/new"),
                    E::item("/dashboard/users/import"),
                ]),
                E::item("/dashboard/departments").icon("building"),
                E::item("/dashboard/sessions").icon("calendar-range"),
                E::item("/dashboard/settings").icon("settings"),
            ],
        )
        .only_for(&[Role::Admin]),
        NavSection::new(
            "Department",
            "building-2",
            vec![
                E::item("/dashboard/faculty").icon("graduation-cap").children(vec![
                    E::item("/dashboard/faculty").labelled("Members"),
                    E::item("/dashboard/faculty/assignments"),
                ]),
                E::item("/dashboard/users").icon("users"),
                E::item("/dashboard/reports").icon("bar-chart").children(vec![
                    E::item("/dashboard/reports/attendance"),
                    E::item("/dashboard/reports/results"),
                ]),
            ],
        ),
        NavSection::new(
            "Teaching",
            "book-open",
            vec![
                E::item("/dashboard/courses").icon("library").children(vec![
                    E::item("/dashboard/courses").labelled("Catalogue"),
                    E::item("/dashboard/courses/new"),
                ]),
                E::item("/dashboard/classes").icon("presentation"),
                E::item("/dashboard/attendance").icon("clipboard-check"),
                E::item("/dashboard/assignments").icon("file-text"),
                E::item("/dashboard/grades").icon("award").children(vec![
                    E::item("/dashboard/grades").labelled("Results"),
                    E::item("/dashboard/grades/entry"),
                ]),
            ],
        ),
        NavSection::new(
            "Account",
            "user",
            vec![
                E::item("/dashboard/profile").icon("user-circle"),
                E::item("/help").icon("life-buoy"),
            ],
        ),
    ]
}
