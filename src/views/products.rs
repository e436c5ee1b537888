//! Product Manager View
//!
//! Lists the whole catalogue and edits it. After every successful mutation
//! the full collection is fetched again; nothing is merged locally.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::product_form::{FormError, ProductField, ProductForm};
use super::{Lifecycle, Notice};
use crate::client::{AdminApi, ClientError, Product};
use crate::storage::TokenSlot;

/// Question asked before a product is deleted
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

/// Asks the operator to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Errors from product actions
#[derive(Error, Debug)]
pub enum ProductError {
    #[error("Invalid product: {0}")]
    Form(#[from] FormError),

    #[error("No product is being edited")]
    NoEditor,

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// The open create/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEditor {
    /// Id of the product being edited, `None` when creating
    pub target: Option<String>,
    pub form: ProductForm,
}

impl ProductEditor {
    pub fn is_create(&self) -> bool {
        self.target.is_none()
    }
}

/// Everything the products screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct ProductsState {
    pub products: Vec<Product>,
    pub loading: bool,
    pub editor: Option<ProductEditor>,
    pub notice: Option<Notice>,
}

impl Default for ProductsState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            loading: true,
            editor: None,
            notice: None,
        }
    }
}

/// Product manager view model
pub struct ProductManager {
    api: Arc<dyn AdminApi>,
    tokens: TokenSlot,
    state: RwLock<ProductsState>,
    lifecycle: Lifecycle,
}

impl ProductManager {
    pub fn new(api: Arc<dyn AdminApi>, tokens: TokenSlot) -> Self {
        Self {
            api,
            tokens,
            state: RwLock::new(ProductsState::default()),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Fetch the full collection
    ///
    /// On failure the current collection is kept (empty on first load) and
    /// a diagnostic is logged.
    pub async fn load(&self) {
        let result = self.api.list_products().await;

        if !self.lifecycle.is_mounted() {
            tracing::debug!("Products view unmounted, dropping listing");
            return;
        }

        let mut state = self.state.write().await;
        match result {
            Ok(products) => {
                tracing::debug!(count = products.len(), "Loaded products");
                state.products = products;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load products");
            }
        }
        state.loading = false;
    }

    pub async fn snapshot(&self) -> ProductsState {
        self.state.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    pub async fn editor(&self) -> Option<ProductEditor> {
        self.state.read().await.editor.clone()
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    /// Open an empty form for a new product
    pub async fn open_create(&self) {
        self.state.write().await.editor = Some(ProductEditor {
            target: None,
            form: ProductForm::default(),
        });
    }

    /// Open the form pre-filled with the product `id`
    pub async fn open_edit(&self, id: &str) -> Result<(), ProductError> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ProductError::UnknownProduct(id.to_string()))?;

        let editor = ProductEditor {
            target: Some(product.id.clone()),
            form: ProductForm::from_product(product),
        };
        state.editor = Some(editor);
        Ok(())
    }

    /// Change one field of the open form
    pub async fn set_field(&self, field: ProductField, value: &str) -> Result<(), ProductError> {
        let mut state = self.state.write().await;
        let editor = state.editor.as_mut().ok_or(ProductError::NoEditor)?;
        editor.form.set(field, value);
        Ok(())
    }

    pub async fn close_editor(&self) {
        self.state.write().await.editor = None;
    }

    /// Save the open form
    ///
    /// Creates or updates depending on the editor target. On success the
    /// collection is re-fetched and the form closed; on failure the form
    /// stays open and the server's message becomes the notice.
    pub async fn submit(&self) -> Result<Product, ProductError> {
        let editor = self.editor().await.ok_or(ProductError::NoEditor)?;

        let input = match editor.form.validate() {
            Ok(input) => input,
            Err(e) => {
                self.state.write().await.notice = Some(Notice::Error(e.to_string()));
                return Err(e.into());
            }
        };

        let token = self.tokens.current();
        let result = match &editor.target {
            Some(id) => self.api.update_product(id, &input, token.as_deref()).await,
            None => self.api.create_product(&input, token.as_deref()).await,
        };

        if !self.lifecycle.is_mounted() {
            return result.map_err(ProductError::from);
        }

        match result {
            Ok(product) => {
                let message = if editor.is_create() {
                    "Product created"
                } else {
                    "Product updated"
                };
                tracing::info!(product_id = %product.id, "{}", message);
                {
                    let mut state = self.state.write().await;
                    state.editor = None;
                    state.notice = Some(Notice::Success(message.to_string()));
                }
                self.load().await;
                Ok(product)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save product");
                self.state.write().await.notice = Some(Notice::Error(e.user_message()));
                Err(e.into())
            }
        }
    }

    /// Delete the product `id` once `confirm` agrees
    ///
    /// Returns `Ok(false)` without issuing any request when the operator
    /// declines.
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> Result<bool, ProductError> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(product_id = %id, "Delete cancelled");
            return Ok(false);
        }

        let token = self.tokens.current();
        let result = self.api.delete_product(id, token.as_deref()).await;

        if !self.lifecycle.is_mounted() {
            return result.map(|_| true).map_err(ProductError::from);
        }

        match result {
            Ok(()) => {
                tracing::info!(product_id = %id, "Product deleted");
                self.state.write().await.notice =
                    Some(Notice::Success("Product deleted".to_string()));
                self.load().await;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "Failed to delete product");
                self.state.write().await.notice = Some(Notice::Error(e.user_message()));
                Err(e.into())
            }
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_user, product, slot_with, FakeApi};

    fn manager(api: FakeApi) -> (Arc<FakeApi>, ProductManager) {
        let api = Arc::new(api.with_session("t1", admin_user()));
        let manager = ProductManager::new(api.clone(), slot_with("t1"));
        (api, manager)
    }

    async fn fill_widget(manager: &ProductManager) {
        for (field, value) in [
            (ProductField::Name, "Widget"),
            (ProductField::Description, "A very useful widget"),
            (ProductField::Price, "9.99"),
            (ProductField::Category, "tools"),
            (ProductField::Stock, "5"),
            (ProductField::Image, "https://img.example.com/widget.png"),
        ] {
            manager.set_field(field, value).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_lists_products() {
        let (_api, manager) = manager(FakeApi::new().with_product(product("p1", "Hammer")));
        assert!(manager.snapshot().await.loading);

        manager.load().await;

        let state = manager.snapshot().await;
        assert!(!state.loading);
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.products[0].name, "Hammer");
    }

    #[tokio::test]
    async fn test_load_failure_leaves_collection_empty() {
        let (api, manager) = manager(
            FakeApi::new()
                .with_product(product("p1", "Hammer"))
                .failing_lists(),
        );

        manager.load().await;

        let state = manager.snapshot().await;
        assert!(state.products.is_empty());
        assert!(!state.loading);
        assert_eq!(api.calls(), vec!["list".to_string()]);
    }

    #[tokio::test]
    async fn test_create_then_list_contains_widget() {
        let (api, manager) = manager(FakeApi::new());
        manager.load().await;

        manager.open_create().await;
        fill_widget(&manager).await;
        let created = manager.submit().await.unwrap();

        assert_eq!(created.name, "Widget");
        let products = manager.products().await;
        let widget = products.iter().find(|p| p.name == "Widget").unwrap();
        assert_eq!(widget.price, 9.99);
        assert_eq!(widget.stock, 5);

        assert!(manager.editor().await.is_none());
        assert_eq!(
            manager.notice().await,
            Some(Notice::Success("Product created".to_string()))
        );
        assert_eq!(api.calls(), vec!["list", "create", "list"]);
    }

    #[tokio::test]
    async fn test_edit_prefills_and_updates() {
        let (api, manager) = manager(FakeApi::new().with_product(product("p1", "Hammer")));
        manager.load().await;

        manager.open_edit("p1").await.unwrap();
        let editor = manager.editor().await.unwrap();
        assert_eq!(editor.target.as_deref(), Some("p1"));
        assert_eq!(editor.form.name, "Hammer");
        assert_eq!(editor.form.price, "19.5");

        manager.set_field(ProductField::Stock, "11").await.unwrap();
        manager.submit().await.unwrap();

        assert_eq!(manager.products().await[0].stock, 11);
        assert_eq!(api.calls(), vec!["list", "update:p1", "list"]);
    }

    #[tokio::test]
    async fn test_edit_unknown_product() {
        let (_api, manager) = manager(FakeApi::new());
        manager.load().await;
        assert!(matches!(
            manager.open_edit("nope").await,
            Err(ProductError::UnknownProduct(_))
        ));
    }

    #[tokio::test]
    async fn test_server_rejection_keeps_form_open() {
        let (api, manager) = manager(FakeApi::new());
        manager.load().await;
        manager.open_create().await;
        fill_widget(&manager).await;
        api.fail_next(400, "Product name already exists");

        let err = manager.submit().await.unwrap_err();

        assert!(matches!(err, ProductError::Client(ClientError::Server { status: 400, .. })));
        assert!(manager.editor().await.is_some());
        assert_eq!(
            manager.notice().await,
            Some(Notice::Error("Product name already exists".to_string()))
        );
        assert_eq!(api.calls(), vec!["list", "create"]);
    }

    #[tokio::test]
    async fn test_invalid_form_issues_no_request() {
        let (api, manager) = manager(FakeApi::new());
        manager.load().await;
        manager.open_create().await;
        manager.set_field(ProductField::Name, "Widget").await.unwrap();

        let err = manager.submit().await.unwrap_err();

        assert!(matches!(
            err,
            ProductError::Form(FormError::Missing(ProductField::Description))
        ));
        assert!(manager.notice().await.unwrap().is_error());
        assert_eq!(api.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_submit_without_editor() {
        let (_api, manager) = manager(FakeApi::new());
        assert!(matches!(manager.submit().await, Err(ProductError::NoEditor)));
        assert!(matches!(
            manager.set_field(ProductField::Name, "x").await,
            Err(ProductError::NoEditor)
        ));
    }

    #[tokio::test]
    async fn test_delete_without_confirmation_issues_no_request() {
        let (api, manager) = manager(FakeApi::new().with_product(product("p1", "Hammer")));
        manager.load().await;

        let deleted = manager.delete("p1", &|_: &str| false).await.unwrap();

        assert!(!deleted);
        assert_eq!(manager.products().await.len(), 1);
        assert_eq!(api.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_delete_confirmed_refetches() {
        let (api, manager) = manager(
            FakeApi::new()
                .with_product(product("p1", "Hammer"))
                .with_product(product("p2", "Saw")),
        );
        manager.load().await;

        let asked = std::sync::Mutex::new(String::new());
        let confirm = |prompt: &str| {
            *asked.lock().unwrap() = prompt.to_string();
            true
        };
        assert!(manager.delete("p1", &confirm).await.unwrap());

        assert_eq!(*asked.lock().unwrap(), DELETE_PROMPT);
        let names: Vec<String> = manager.products().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Saw"]);
        assert_eq!(api.calls(), vec!["list", "delete:p1", "list"]);
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_collection() {
        let (api, manager) = manager(FakeApi::new().with_product(product("p1", "Hammer")));
        manager.load().await;
        api.fail_next(500, "Could not delete");

        let err = manager.delete("p1", &|_: &str| true).await.unwrap_err();

        assert!(matches!(err, ProductError::Client(_)));
        assert_eq!(manager.products().await.len(), 1);
        assert_eq!(
            manager.notice().await,
            Some(Notice::Error("Could not delete".to_string()))
        );
    }

    #[tokio::test]
    async fn test_listing_after_unmount_is_dropped() {
        let (api, manager) = manager(FakeApi::new().with_product(product("p1", "Hammer")));
        let gate = api.hold_requests();
        let manager = Arc::new(manager);

        let loading = tokio::spawn({
            let manager = Arc::clone(&manager);
            async move { manager.load().await }
        });
        while api.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        manager.unmount();
        gate.notify_one();
        loading.await.unwrap();

        let state = manager.snapshot().await;
        assert!(state.products.is_empty());
        assert!(state.loading);
    }
}
