//! Route guard.
//!
//! Maps navigable paths to routes and decides, from the session, whether a
//! route renders or redirects to login.

use std::fmt;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    /// The todo list; requires a session.
    Todos,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Todos => "/todos",
        }
    }

    pub fn is_protected(self) -> bool {
        matches!(self, Route::Todos)
    }

    /// Resolves a path. Unknown paths fall back to the todo list when a
    /// session exists and to login otherwise.
    pub fn resolve(path: &str, session: Option<&Session>) -> Self {
        let normalized = path.trim().trim_end_matches('/');
        match normalized {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/todos" => Route::Todos,
            _ if session.is_some() => Route::Todos,
            _ => Route::Login,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of guarding a route: exactly one of render or redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guarded {
    Render(Route),
    Redirect(Route),
}

/// Lets public routes through and sends protected ones to login when there
/// is no session.
pub fn guard(route: Route, session: Option<&Session>) -> Guarded {
    if route.is_protected() && session.is_none() {
        Guarded::Redirect(Route::Login)
    } else {
        Guarded::Render(route)
    }
}

/// Resolves `path` and guards the result.
pub fn navigate(path: &str, session: Option<&Session>) -> Guarded {
    guard(Route::resolve(path, session), session)
}
