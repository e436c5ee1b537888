//! # Storeadmin
//!
//! Administration panel for an online store, talking to the store's REST
//! API: an admin-only session gate, a sales dashboard and product
//! management.
//!
//! ## Modules
//!
//! - [`client`]: Typed REST client and the [`AdminApi`] seam
//! - [`storage`]: Key-value persistence for the bearer token
//! - [`session`]: Observable admin session
//! - [`router`]: Route guard and navigator
//! - [`views`]: Login, dashboard and product manager view models
//! - [`panel`]: Everything wired together
//! - [`devserver`]: In-memory development API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storeadmin::{AdminPanel, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut panel = AdminPanel::from_config(&Config::load_default())?;
//!     panel.start().await;
//!
//!     panel.login("admin@example.com", "admin123").await?;
//!     panel.navigate("/products").await;
//!
//!     if let Some(products) = panel.products() {
//!         for product in products.products().await {
//!             println!("{} {}", product.name, product.price);
//!         }
//!     }
//!
//!     panel.logout().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod devserver;
pub mod logging;
pub mod panel;
pub mod router;
pub mod session;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test_support;

pub use client::{AdminApi, ApiClient, ClientError, ClientResult, Product, ProductInput, Stats, User};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult, TokenSlot};

pub use session::{Session, SessionError, SessionStore};

pub use router::{AuthStatus, Navigator, Route, Screen};

pub use views::{
    DashboardState, DashboardView, FormError, LoginError, ProductError, ProductField,
    ProductManager,
};

pub use panel::{AdminPanel, Layout, PanelError};

pub use config::{Config, ConfigError, LoggingConfig};

pub use devserver::{build_router, DevApiError, DevState};
