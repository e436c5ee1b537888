//! Route Guard
//!
//! Decides, per navigation, which screen the panel shows. The decision
//! depends only on the requested route and the current session, and it is
//! recomputed on every navigation and every session change.
//!
//! | Session | Public route (`/login`) | Protected route (`/dashboard`, `/products`) |
//! |---------|-------------------------|---------------------------------------------|
//! | Loading | placeholder | placeholder |
//! | Authenticated | redirect `/dashboard` | render |
//! | Unauthenticated | render | redirect `/login` |
//!
//! The root path always redirects to `/login`; unknown paths render a
//! not-found screen.

mod navigator;

pub use navigator::Navigator;

use crate::session::Session;

/// Known locations of the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Dashboard,
    Products,
    NotFound(String),
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only visitors without a session
    PublicOnly,
    /// Only authenticated administrators
    Protected,
    /// Anyone, no guard
    Open,
}

impl Route {
    /// Landing route for authenticated administrators
    pub const LANDING: Route = Route::Dashboard;
    /// Entry route for everybody else
    pub const ENTRY: Route = Route::Login;

    /// Resolve a path. Query strings, fragments and trailing slashes are
    /// ignored.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Route::Root,
            "/login" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/products" => Route::Products,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Products => "/products",
            Route::NotFound(path) => path,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login => Access::PublicOnly,
            Route::Dashboard | Route::Products => Access::Protected,
            Route::Root | Route::NotFound(_) => Access::Open,
        }
    }
}

/// Authentication state as seen by the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

impl From<&Session> for AuthStatus {
    fn from(session: &Session) -> Self {
        if session.loading {
            AuthStatus::Loading
        } else if session.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

/// Result of guarding one navigation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Session not settled yet, show a neutral placeholder
    Placeholder,
    /// Go somewhere else instead
    Redirect(Route),
    /// Show the requested route
    Render(Route),
}

/// What the panel displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Login,
    Dashboard,
    Products,
    NotFound,
}

/// Guard a single navigation step
pub fn evaluate(status: AuthStatus, route: &Route) -> Outcome {
    if *route == Route::Root {
        return Outcome::Redirect(Route::ENTRY);
    }

    match (route.access(), status) {
        (Access::Open, _) => Outcome::Render(route.clone()),
        (_, AuthStatus::Loading) => Outcome::Placeholder,
        (Access::PublicOnly, AuthStatus::Authenticated) => Outcome::Redirect(Route::LANDING),
        (Access::Protected, AuthStatus::Unauthenticated) => Outcome::Redirect(Route::ENTRY),
        _ => Outcome::Render(route.clone()),
    }
}

/// Maximum redirects followed for one navigation
const MAX_REDIRECTS: usize = 4;

/// Follow redirects from `route` until something renders
///
/// Returns the final location and the screen to show. A placeholder keeps
/// the location that was being evaluated.
pub fn resolve(status: AuthStatus, route: Route) -> (Route, Screen) {
    let mut location = route;

    for _ in 0..MAX_REDIRECTS {
        match evaluate(status, &location) {
            Outcome::Placeholder => return (location, Screen::Loading),
            Outcome::Redirect(next) => {
                tracing::debug!(from = location.path(), to = next.path(), "Redirect");
                location = next;
            }
            Outcome::Render(rendered) => {
                let screen = screen_for(&rendered);
                return (rendered, screen);
            }
        }
    }

    tracing::warn!(location = location.path(), "Redirect loop, showing placeholder");
    (location, Screen::Loading)
}

fn screen_for(route: &Route) -> Screen {
    match route {
        Route::Login => Screen::Login,
        Route::Dashboard => Screen::Dashboard,
        Route::Products => Screen::Products,
        Route::Root | Route::NotFound(_) => Screen::NotFound,
    }
}
