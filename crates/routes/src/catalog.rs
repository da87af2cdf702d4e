//! The campus portal's route table.
//!
//! This is the only place that says which role reaches which page. The edge
//! gate, the client guard and the navigation tree all read it from here.

use campus_auth::Role;
use campus_core::ConfigResult;

use crate::registry::{RouteDescriptor, RouteRegistry};

pub const LOGIN: &str = "/login";

const ALL: &[Role] = &Role::ALL;
const STAFF: &[Role] = &[Role::Admin, Role::DepartmentHead];
const FACULTY: &[Role] = &[Role::Admin, Role::DepartmentHead, Role::Teacher];

/// Build and validate the portal registry.
pub fn route_registry() -> ConfigResult<RouteRegistry> {
    use RouteDescriptor as R;

    RouteRegistry::builder()
        .route(R::guest(LOGIN, "Sign in", "Sign in to the campus portal")?)
        .route(R::public("/forgot-password", "Forgot password", "Request a password reset link")?)
        .route(R::public("/help", "Help", "Portal help and contact details")?)
        .route(R::protected("/dashboard", "Dashboard", "Overview of your portal activity", ALL)?)
        .route(R::protected("/dashboard/profile", "Profile", "Your account details", ALL)?)
        .route(R::protected("/dashboard/timetable", "Timetable", "Weekly lecture schedule", ALL)?)
        .route(R::protected("/dashboard/notices", "Notices", "Campus and department announcements", ALL)?)
        // administration
        .route(R::protected("/dashboard/users", "Users", "Manage portal accounts", STAFF)?)
        .route(R::protected("/dashboard/users/new", "New user", "Create a portal account", &[Role::Admin])?)
        .route(R::protected("/dashboard/users/import", "Import users", "Bulk import accounts from a spreadsheet", &[Role::Admin])?)
        .route(R::protected("/dashboard/departments", "Departments", "Manage departments and their heads", &[Role::Admin])?)
        .route(R::protected("/dashboard/sessions", "Academic sessions", "Manage terms and academic years", &[Role::Admin])?)
        .route(R::protected("/dashboard/settings", "Settings", "Portal-wide settings", &[Role::Admin])?)
        // department
        .route(R::protected("/dashboard/faculty", "Faculty", "Teachers in your department", STAFF)?)
        .route(R::protected("/dashboard/faculty/assignments", "Course assignments", "Assign teachers to courses", STAFF)?)
        .route(R::protected("/dashboard/reports", "Reports", "Department performance reports", STAFF)?)
        .route(R::protected("/dashboard/reports/attendance", "Attendance report", "Attendance across courses", STAFF)?)
        .route(R::protected("/dashboard/reports/results", "Results report", "Grade distribution across courses", STAFF)?)
        // teaching
        .route(R::protected("/dashboard/courses", "Courses", "Course catalogue and enrolments", ALL)?)
        .route(R::protected("/dashboard/courses/new", "New course", "Propose a new course", STAFF)?)
        .route(R::protected("/dashboard/classes", "My classes", "Classes you teach", &[Role::Teacher])?)
        .route(R::protected("/dashboard/attendance", "Attendance", "Record and review attendance", &[Role::Teacher, Role::Student])?)
        .route(R::protected("/dashboard/assignments", "Assignments", "Coursework and submissions", &[Role::Teacher, Role::Student])?)
        .route(R::protected("/dashboard/grades", "Grades", "Marks and results", &[Role::DepartmentHead, Role::Teacher, Role::Student])?)
        .route(R::protected("/dashboard/grades/entry", "Grade entry", "Enter marks for your classes", &[Role::Teacher])?)
        // portal data endpoints
        .route(R::protected("/_portal", "Portal data", "Session, navigation and breadcrumb data", ALL)?)
        .route(R::protected("/_portal/explain", "Access explanation", "Explain an access decision", FACULTY)?)
        .login(LOGIN)
        .default_route(Role::Admin, "/dashboard")
        .default_route(Role::DepartmentHead, "/dashboard/faculty")
        .default_route(Role::Teacher, "/dashboard/classes")
        .default_route(Role::Student, "/dashboard/courses")
        .build()
}
