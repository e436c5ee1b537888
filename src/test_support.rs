//! Test doubles shared by the unit tests

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use crate::client::{
    AdminApi, CategorySales, ClientError, ClientResult, LoginResponse, MonthlySales,
    OrderCustomer, Overview, Product, ProductInput, RecentOrder, Stats, TopProduct, User,
};
use crate::storage::{MemoryStore, TokenSlot};

struct Account {
    email: String,
    password: String,
    token: String,
    user: User,
}

#[derive(Default)]
struct FakeState {
    accounts: Vec<Account>,
    tokens: HashMap<String, User>,
    products: Vec<Product>,
    stats: Option<Stats>,
    fail_next: Option<(u16, String)>,
    fail_lists: bool,
    calls: Vec<String>,
    next_id: u32,
}

/// In-memory [`AdminApi`] with programmable answers and call recording
#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `email`/`password`, answering with `token` and `user`
    pub fn with_account(self, email: &str, password: &str, token: &str, user: User) -> Self {
        self.lock().accounts.push(Account {
            email: email.to_string(),
            password: password.to_string(),
            token: token.to_string(),
            user,
        });
        self
    }

    /// Treat `token` as already issued to `user`
    pub fn with_session(self, token: &str, user: User) -> Self {
        self.lock().tokens.insert(token.to_string(), user);
        self
    }

    pub fn with_product(self, product: Product) -> Self {
        self.lock().products.push(product);
        self
    }

    pub fn with_stats(self, stats: Stats) -> Self {
        self.lock().stats = Some(stats);
        self
    }

    /// Make every product listing fail with a 500
    pub fn failing_lists(self) -> Self {
        self.lock().fail_lists = true;
        self
    }

    /// Make the next mutating call answer `status` with `message`
    pub fn fail_next(&self, status: u16, message: &str) {
        self.lock().fail_next = Some((status, message.to_string()));
    }

    /// Park every subsequent call until the returned handle is notified
    pub fn hold_requests(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    async fn enter(&self, call: String) {
        self.lock().calls.push(call);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn authorize(&self, token: Option<&str>) -> ClientResult<()> {
        let state = self.lock();
        match token.and_then(|t| state.tokens.get(t)) {
            Some(user) if user.is_admin => Ok(()),
            Some(_) => Err(server(403, "Admin access required")),
            None => Err(unauthorized("Not authorized, no token")),
        }
    }

    fn take_failure(&self) -> ClientResult<()> {
        match self.lock().fail_next.take() {
            Some((401, message)) => Err(unauthorized(&message)),
            Some((status, message)) => Err(server(status, &message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn current_user(&self, token: &str) -> ClientResult<User> {
        self.enter("me".to_string()).await;
        self.lock()
            .tokens
            .get(token)
            .cloned()
            .ok_or_else(|| unauthorized("Token invalid or expired"))
    }

    async fn authenticate(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        self.enter(format!("login:{}", email)).await;
        let mut state = self.lock();
        let (token, user) = state
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .map(|a| (a.token.clone(), a.user.clone()))
            .ok_or_else(|| unauthorized("Invalid email or password"))?;
        state.tokens.insert(token.clone(), user.clone());
        Ok(LoginResponse { token, user })
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.enter("list".to_string()).await;
        let state = self.lock();
        if state.fail_lists {
            return Err(server(500, "Database unavailable"));
        }
        Ok(state.products.clone())
    }

    async fn create_product(
        &self,
        input: &ProductInput,
        token: Option<&str>,
    ) -> ClientResult<Product> {
        self.enter("create".to_string()).await;
        self.authorize(token)?;
        self.take_failure()?;

        let mut state = self.lock();
        state.next_id += 1;
        let product = Product {
            id: format!("new{}", state.next_id),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            category: input.category.clone(),
            stock: input.stock,
            image: input.image.clone(),
            sold: 0,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
        token: Option<&str>,
    ) -> ClientResult<Product> {
        self.enter(format!("update:{}", id)).await;
        self.authorize(token)?;
        self.take_failure()?;

        let mut state = self.lock();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| server(404, "Product not found"))?;
        product.name = input.name.clone();
        product.description = input.description.clone();
        product.price = input.price;
        product.category = input.category.clone();
        product.stock = input.stock;
        product.image = input.image.clone();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &str, token: Option<&str>) -> ClientResult<()> {
        self.enter(format!("delete:{}", id)).await;
        self.authorize(token)?;
        self.take_failure()?;

        let mut state = self.lock();
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        if state.products.len() == before {
            return Err(server(404, "Product not found"));
        }
        Ok(())
    }

    async fn stats(&self, token: Option<&str>) -> ClientResult<Stats> {
        self.enter("stats".to_string()).await;
        self.authorize(token)?;
        self.lock()
            .stats
            .clone()
            .ok_or_else(|| server(500, "Stats unavailable"))
    }
}

pub(crate) fn unauthorized(message: &str) -> ClientError {
    ClientError::Authentication {
        status: 401,
        message: message.to_string(),
    }
}

pub(crate) fn server(status: u16, message: &str) -> ClientError {
    ClientError::Server {
        status,
        message: message.to_string(),
    }
}

pub(crate) fn admin_user() -> User {
    User {
        id: "u-admin".to_string(),
        name: "ada admin".to_string(),
        email: "admin@x.com".to_string(),
        is_admin: true,
    }
}

pub(crate) fn customer_user() -> User {
    User {
        id: "u-customer".to_string(),
        name: "Carl Customer".to_string(),
        email: "carl@x.com".to_string(),
        is_admin: false,
    }
}

pub(crate) fn product(id: &str, name: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        price: 19.5,
        category: "tools".to_string(),
        stock: 3,
        image: format!("https://img.example.com/{}.png", id),
        sold: 7,
    }
}

pub(crate) fn sample_stats() -> Stats {
    Stats {
        overview: Overview {
            total_sales: 1234567.5,
            total_orders: 42,
            total_users: 17,
            total_products: 9,
        },
        sales_by_month: vec![
            MonthlySales {
                month: "2024-01".to_string(),
                total: 1000.0,
            },
            MonthlySales {
                month: "2024-02".to_string(),
                total: 3000.0,
            },
        ],
        sales_by_category: vec![
            CategorySales {
                category: "tools".to_string(),
                total: 300.0,
            },
            CategorySales {
                category: "toys".to_string(),
                total: 100.0,
            },
        ],
        top_products: vec![TopProduct {
            name: "Widget".to_string(),
            sold: 12,
        }],
        recent_orders: vec![RecentOrder {
            id: "64f0c0ffee0000000000abcd".to_string(),
            user: OrderCustomer {
                name: "Carl Customer".to_string(),
            },
            total_amount: 99.5,
            created_at: Utc.with_ymd_and_hms(2024, 2, 3, 10, 30, 0).unwrap(),
            status: "shipped".to_string(),
        }],
    }
}

/// A token slot over a fresh in-memory store
pub(crate) fn memory_slot() -> TokenSlot {
    TokenSlot::new(Arc::new(MemoryStore::new()))
}

/// A token slot already holding `token`
pub(crate) fn slot_with(token: &str) -> TokenSlot {
    let slot = memory_slot();
    slot.set(token).unwrap();
    slot
}
