//! In-memory store behind the development API
//!
//! Seeded with one administrator, one customer, a small catalogue and a
//! few months of orders. Nothing is persisted.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::error::{DevApiError, DevApiResult};
use super::stats::compute_stats;
use crate::client::{Product, ProductInput, Stats, User};
use crate::config::DevServerConfig;

/// Seeded customer credentials
pub const CUSTOMER_EMAIL: &str = "jane@example.com";
pub const CUSTOMER_PASSWORD: &str = "customer123";

/// A registered account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl Account {
    pub fn user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Default)]
pub(crate) struct Store {
    pub accounts: Vec<Account>,
    pub sessions: HashMap<String, String>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
}

/// Shared state of the development API
#[derive(Debug, Default)]
pub struct DevState {
    store: RwLock<Store>,
}

/// Mongo-style 24 hex digit identifier
pub fn object_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id
}

impl DevState {
    /// State with no accounts, products or orders
    pub fn empty() -> Self {
        Self::default()
    }

    /// State with demo data; the admin credentials come from `config`
    pub fn seeded(config: &DevServerConfig) -> Self {
        let admin = Account {
            id: object_id(),
            name: "Admin User".to_string(),
            email: config.admin_email.clone(),
            password: config.admin_password.clone(),
            is_admin: true,
        };
        let customer = Account {
            id: object_id(),
            name: "Jane Customer".to_string(),
            email: CUSTOMER_EMAIL.to_string(),
            password: CUSTOMER_PASSWORD.to_string(),
            is_admin: false,
        };

        let products: Vec<Product> = [
            ("Wireless Headphones", "Over-ear, noise cancelling", 89.99, "electronics", 25, 48),
            ("Mechanical Keyboard", "Tenkeyless, brown switches", 129.5, "electronics", 12, 31),
            ("Cotton T-Shirt", "Unisex crew neck", 19.99, "clothing", 120, 76),
            ("Rain Jacket", "Packable and waterproof", 74.0, "clothing", 30, 14),
            ("Chef's Knife", "20cm stainless steel", 45.25, "home", 40, 22),
            ("Desk Lamp", "Dimmable LED", 32.0, "home", 18, 9),
            ("Rust in Action", "Systems programming book", 39.99, "books", 60, 27),
        ]
        .into_iter()
        .map(|(name, description, price, category, stock, sold)| {
            let id = object_id();
            Product {
                image: format!("https://images.example.com/products/{}.jpg", id),
                id,
                name: name.to_string(),
                description: description.to_string(),
                price,
                category: category.to_string(),
                stock,
                sold,
            }
        })
        .collect();

        let now = Utc::now();
        let orders: Vec<Order> = [
            (0_i64, 1_usize, 2_usize, 3_u32, "pending"),
            (1, 0, 1, 1, "processing"),
            (3, 2, 4, 2, "shipped"),
            (9, 6, 6, 1, "delivered"),
            (16, 3, 2, 1, "delivered"),
            (34, 4, 1, 2, "delivered"),
            (47, 5, 0, 1, "delivered"),
            (65, 0, 6, 2, "delivered"),
            (93, 1, 3, 1, "cancelled"),
        ]
        .into_iter()
        .map(|(days_ago, first, second, quantity, status)| {
            let items: Vec<OrderItem> = [first, second]
                .into_iter()
                .map(|i| OrderItem {
                    product_id: products[i].id.clone(),
                    quantity,
                    price: products[i].price,
                })
                .collect();
            let total_amount: f64 = items.iter().map(|i| i.price * i.quantity as f64).sum();
            Order {
                id: object_id(),
                user_id: customer.id.clone(),
                items,
                total_amount,
                created_at: now - Duration::days(days_ago),
                status: status.to_string(),
            }
        })
        .collect();

        let store = Store {
            accounts: vec![admin, customer],
            sessions: HashMap::new(),
            products,
            orders,
        };

        Self {
            store: RwLock::new(store),
        }
    }

    pub async fn add_account(&self, account: Account) {
        self.store.write().await.accounts.push(account);
    }

    pub async fn add_order(&self, order: Order) {
        self.store.write().await.orders.push(order);
    }

    /// Check credentials and issue a fresh token
    pub async fn login(&self, email: &str, password: &str) -> DevApiResult<(String, User)> {
        let mut store = self.store.write().await;
        let user = store
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(Account::user)
            .ok_or_else(|| DevApiError::Unauthorized("Invalid email or password".to_string()))?;

        let token = uuid::Uuid::new_v4().to_string();
        store.sessions.insert(token.clone(), user.id.clone());

        tracing::info!(user_id = %user.id, "Issued token");
        Ok((token, user))
    }

    /// Account owning `token`
    pub async fn user_for_token(&self, token: &str) -> Option<User> {
        let store = self.store.read().await;
        let user_id = store.sessions.get(token)?;
        store
            .accounts
            .iter()
            .find(|a| &a.id == user_id)
            .map(Account::user)
    }

    pub async fn products(&self) -> Vec<Product> {
        self.store.read().await.products.clone()
    }

    pub async fn create_product(&self, input: ProductInput) -> Product {
        let product = Product {
            id: object_id(),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            stock: input.stock,
            image: input.image,
            sold: 0,
        };
        self.store.write().await.products.push(product.clone());
        product
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> DevApiResult<Product> {
        let mut store = self.store.write().await;
        let product = store
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| product_not_found(id))?;

        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.category = input.category;
        product.stock = input.stock;
        product.image = input.image;

        Ok(product.clone())
    }

    pub async fn delete_product(&self, id: &str) -> DevApiResult<()> {
        let mut store = self.store.write().await;
        let before = store.products.len();
        store.products.retain(|p| p.id != id);
        if store.products.len() == before {
            return Err(product_not_found(id));
        }
        Ok(())
    }

    pub async fn stats(&self) -> Stats {
        compute_stats(&*self.store.read().await)
    }
}

fn product_not_found(id: &str) -> DevApiError {
    DevApiError::NotFound(format!("Product {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: "d".to_string(),
            price: 9.99,
            category: "tools".to_string(),
            stock: 5,
            image: "https://img.example.com/w.png".to_string(),
        }
    }

    #[test]
    fn test_object_id_shape() {
        let id = object_id();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_login_issues_distinct_tokens() {
        let state = DevState::seeded(&DevServerConfig::default());

        let (first, user) = state.login("admin@example.com", "admin123").await.unwrap();
        let (second, _) = state.login("ADMIN@example.com", "admin123").await.unwrap();

        assert!(user.is_admin);
        assert_ne!(first, second);
        assert_eq!(state.user_for_token(&first).await, Some(user));
        assert!(state.user_for_token("bogus").await.is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let state = DevState::seeded(&DevServerConfig::default());
        assert!(matches!(
            state.login("admin@example.com", "wrong").await,
            Err(DevApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let state = DevState::empty();

        let created = state.create_product(input("Widget")).await;
        assert_eq!(created.sold, 0);

        let updated = state
            .update_product(&created.id, input("Gadget"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Gadget");

        state.delete_product(&created.id).await.unwrap();
        assert!(state.products().await.is_empty());
        assert!(matches!(
            state.delete_product(&created.id).await,
            Err(DevApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_seeded_catalogue_and_orders() {
        let state = DevState::seeded(&DevServerConfig::default());
        let stats = state.stats().await;

        assert_eq!(stats.overview.total_products, 7);
        assert_eq!(stats.overview.total_users, 2);
        assert_eq!(stats.overview.total_orders, 9);
        assert_eq!(stats.top_products.len(), 5);
        assert_eq!(stats.recent_orders.len(), 5);
    }
}
