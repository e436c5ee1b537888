//! Navigator
//!
//! Tracks the requested location and re-runs the guard whenever the
//! location or the session changes.

use tokio::sync::watch;

use super::{resolve, AuthStatus, Route, Screen};
use crate::session::Session;

/// Current location plus the screen the guard allows for it
pub struct Navigator {
    session: watch::Receiver<Session>,
    location: Route,
    screen: Screen,
}

impl Navigator {
    /// Start at `/` with the session as it currently is
    pub fn new(session: watch::Receiver<Session>) -> Self {
        let mut navigator = Self {
            session,
            location: Route::Root,
            screen: Screen::Loading,
        };
        navigator.refresh();
        navigator
    }

    /// Request `path`
    pub fn navigate(&mut self, path: &str) -> Screen {
        self.location = Route::parse(path);
        self.refresh()
    }

    /// Re-evaluate the current location against the latest session
    pub fn refresh(&mut self) -> Screen {
        let status = AuthStatus::from(&*self.session.borrow_and_update());
        let (location, screen) = resolve(status, self.location.clone());

        if screen != self.screen || location != self.location {
            tracing::debug!(path = location.path(), screen = ?screen, "Navigation settled");
        }

        self.location = location;
        self.screen = screen;
        screen
    }

    /// Screen to show now, re-evaluated if the session changed since the
    /// last look
    pub fn current(&mut self) -> Screen {
        match self.session.has_changed() {
            Ok(true) => self.refresh(),
            _ => self.screen,
        }
    }

    /// Wait for the next session change and re-evaluate
    ///
    /// Returns `None` once the session store is gone.
    pub async fn changed(&mut self) -> Option<Screen> {
        self.session.changed().await.ok()?;
        Some(self.refresh())
    }

    /// Location after redirects
    pub fn location(&self) -> &Route {
        &self.location
    }

    /// Screen from the last evaluation, without checking for changes
    pub fn screen(&self) -> Screen {
        self.screen
    }
}
