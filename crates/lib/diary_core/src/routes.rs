//! Client-side route table and route guard.
//!
//! The guard is a stateless check run on every navigation: it needs only
//! "is the session authenticated" and the session's claims, never the
//! network.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::auth::{Claims, Role};

/// Views under `/student`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentView {
    Dashboard,
    Schedule,
    Marks,
}

/// Views under `/teacher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherView {
    Dashboard,
    Schedules,
    Marks,
    Students,
    Lessons,
    StudentMarks(i64),
}

/// Every navigable location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`, the login page, reachable by anyone.
    Login,
    Student(StudentView),
    Teacher(TeacherView),
}

impl Route {
    /// Role a session must have to render this route; `None` for public routes.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Login => None,
            Route::Student(_) => Some(Role::Student),
            Route::Teacher(_) => Some(Role::Teacher),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Landing route after login for a role. Unknown roles have none.
    pub fn home_for(role: Role) -> Option<Route> {
        match role {
            Role::Student => Some(Route::Student(StudentView::Dashboard)),
            Role::Teacher => Some(Route::Teacher(TeacherView::Dashboard)),
            Role::Unknown => None,
        }
    }

    /// Resolve a path; unmatched paths fall back to the login page.
    pub fn resolve(path: &str) -> Route {
        path.parse().unwrap_or(Route::Login)
    }
}

/// Error for paths outside the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route for {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Login,
            ["student"] => Route::Student(StudentView::Dashboard),
            ["student", "schedule"] => Route::Student(StudentView::Schedule),
            ["student", "marks"] => Route::Student(StudentView::Marks),
            ["teacher"] => Route::Teacher(TeacherView::Dashboard),
            ["teacher", "schedules"] => Route::Teacher(TeacherView::Schedules),
            ["teacher", "marks"] => Route::Teacher(TeacherView::Marks),
            ["teacher", "students"] => Route::Teacher(TeacherView::Students),
            ["teacher", "lessons"] => Route::Teacher(TeacherView::Lessons),
            ["teacher", "students", id, "marks"] => match id.parse::<i64>() {
                Ok(id) => Route::Teacher(TeacherView::StudentMarks(id)),
                Err(_) => return Err(UnknownRoute(path.to_string())),
            },
            _ => return Err(UnknownRoute(path.to_string())),
        };
        Ok(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/"),
            Route::Student(StudentView::Dashboard) => f.write_str("/student"),
            Route::Student(StudentView::Schedule) => f.write_str("/student/schedule"),
            Route::Student(StudentView::Marks) => f.write_str("/student/marks"),
            Route::Teacher(TeacherView::Dashboard) => f.write_str("/teacher"),
            Route::Teacher(TeacherView::Schedules) => f.write_str("/teacher/schedules"),
            Route::Teacher(TeacherView::Marks) => f.write_str("/teacher/marks"),
            Route::Teacher(TeacherView::Students) => f.write_str("/teacher/students"),
            Route::Teacher(TeacherView::Lessons) => f.write_str("/teacher/lessons"),
            Route::Teacher(TeacherView::StudentMarks(id)) => {
                write!(f, "/teacher/students/{id}/marks")
            }
        }
    }
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Denied; navigate here instead.
    Redirect(Route),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Gate a protected view.
///
/// Denies when the session is not authenticated, or when `expected` is set
/// and the session's role differs. Denial always redirects to `/`.
pub fn guard(expected: Option<Role>, authenticated: bool, user: Option<&Claims>) -> GuardDecision {
    if !authenticated {
        return GuardDecision::Redirect(Route::Login);
    }
    if let Some(role) = expected
        && !user.is_some_and(|claims| claims.has_role(role))
    {
        return GuardDecision::Redirect(Route::Login);
    }
    GuardDecision::Allow
}

/// Gate a route. Public routes are always allowed.
pub fn guard_route(route: Route, authenticated: bool, user: Option<&Claims>) -> GuardDecision {
    if route.is_public() {
        return GuardDecision::Allow;
    }
    guard(route.required_role(), authenticated, user)
}
