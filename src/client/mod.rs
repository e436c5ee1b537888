//! Store API Client
//!
//! Typed access to the store's REST API. The [`AdminApi`] trait is the seam
//! the session store and views depend on; [`ApiClient`] is the reqwest
//! implementation.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `current_user` | `GET /api/auth/me` (bearer) |
//! | `authenticate` | `POST /api/auth/login` |
//! | `list_products` | `GET /api/products` |
//! | `create_product` | `POST /api/products` (bearer) |
//! | `update_product` | `PUT /api/products/:id` (bearer) |
//! | `delete_product` | `DELETE /api/products/:id` (bearer) |
//! | `stats` | `GET /api/stats` (bearer) |

mod error;
mod http;
pub mod models;

pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use models::{
    CategorySales, LoginRequest, LoginResponse, MeResponse, MonthlySales, OrderCustomer,
    Overview, Product, ProductInput, RecentOrder, Stats, TopProduct, User,
};

use async_trait::async_trait;

/// Operations the admin panel performs against the store API
///
/// Every method that takes a token attaches it as
/// `Authorization: Bearer <token>` when present.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Resolve the account owning `token`
    async fn current_user(&self, token: &str) -> ClientResult<User>;

    /// Exchange credentials for a token and the account
    async fn authenticate(&self, email: &str, password: &str) -> ClientResult<LoginResponse>;

    /// Fetch the whole catalogue
    async fn list_products(&self) -> ClientResult<Vec<Product>>;

    async fn create_product(
        &self,
        input: &ProductInput,
        token: Option<&str>,
    ) -> ClientResult<Product>;

    async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
        token: Option<&str>,
    ) -> ClientResult<Product>;

    async fn delete_product(&self, id: &str, token: Option<&str>) -> ClientResult<()>;

    /// Fetch the aggregate dashboard statistics
    async fn stats(&self, token: Option<&str>) -> ClientResult<Stats>;
}
