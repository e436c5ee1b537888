//! Panel Views
//!
//! View models behind the three screens of the panel. Each view fetches its
//! own data when mounted, keeps a transient copy of it, and drops results
//! that arrive after it was unmounted.
//!
//! - **login**: the public entry form
//! - **dashboard**: read-only sales statistics
//! - **products**: catalogue listing with create/update/delete

pub mod dashboard;
pub mod format;
pub mod login;
pub mod product_form;
pub mod products;

pub use dashboard::{DashboardState, DashboardSummary, DashboardView};
pub use login::{LoginError, LoginForm, LoginView};
pub use product_form::{FormError, ProductField, ProductForm};
pub use products::{Confirm, ProductEditor, ProductError, ProductManager, ProductsState};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared mounted/unmounted flag of a view
///
/// Async work checks it before committing results, so a response that
/// lands after the view was left is discarded.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    mounted: Arc<AtomicBool>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome message shown after a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_shared_between_clones() {
        let lifecycle = Lifecycle::new();
        let observer = lifecycle.clone();
        assert!(observer.is_mounted());

        lifecycle.unmount();
        assert!(!observer.is_mounted());
    }
}
