//! Wire types of the store REST API
//!
//! Field names follow the server's JSON (camelCase, Mongo-style `_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Answer to a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Answer of `GET /api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

/// A catalogue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sold: u32,
}

/// Writable product fields, sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
    pub image: String,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            stock: product.stock,
            image: product.image.clone(),
        }
    }
}

// ============================================
// Statistics
// ============================================

/// Answer of `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub overview: Overview,
    #[serde(default)]
    pub sales_by_month: Vec<MonthlySales>,
    #[serde(default)]
    pub sales_by_category: Vec<CategorySales>,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(default)]
    pub recent_orders: Vec<RecentOrder>,
}

/// Store-wide totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_products: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub sold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub user: OrderCustomer,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub name: String,
}
