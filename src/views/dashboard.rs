//! Dashboard View
//!
//! Fetches the aggregate statistics once when mounted and derives what the
//! screen shows: overview cards, the monthly sales series, category shares,
//! the best sellers and the latest orders. Read-only; no polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::format::{group_thousands, money, percent};
use super::Lifecycle;
use crate::client::{AdminApi, Stats, TopProduct};
use crate::storage::TokenSlot;

/// Colours cycled over the category breakdown
pub const PALETTE: [&str; 5] = ["#667eea", "#764ba2", "#f093fb", "#4facfe", "#00f2fe"];

/// What the dashboard currently holds
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Loading,
    Ready(Stats),
    /// The fetch failed; the screen shows a "could not load" message
    Unavailable,
}

/// Dashboard view model
pub struct DashboardView {
    api: Arc<dyn AdminApi>,
    tokens: TokenSlot,
    state: RwLock<DashboardState>,
    fetched: AtomicBool,
    lifecycle: Lifecycle,
}

impl DashboardView {
    pub fn new(api: Arc<dyn AdminApi>, tokens: TokenSlot) -> Self {
        Self {
            api,
            tokens,
            state: RwLock::new(DashboardState::Loading),
            fetched: AtomicBool::new(false),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Fetch the statistics. Only the first call issues a request.
    pub async fn load(&self) {
        if self.fetched.swap(true, Ordering::SeqCst) {
            return;
        }

        let token = self.tokens.current();
        let result = self.api.stats(token.as_deref()).await;

        if !self.lifecycle.is_mounted() {
            tracing::debug!("Dashboard unmounted, dropping statistics");
            return;
        }

        let next = match result {
            Ok(stats) => DashboardState::Ready(stats),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load statistics");
                DashboardState::Unavailable
            }
        };

        *self.state.write().await = next;
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Presentation of the loaded statistics, if any
    pub async fn summary(&self) -> Option<DashboardSummary> {
        match &*self.state.read().await {
            DashboardState::Ready(stats) => Some(DashboardSummary::from(stats)),
            _ => None,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }
}

/// One overview card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// One point of the monthly sales line
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// One slice of the category breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    /// Share of all category sales, 0-100
    pub percent: f64,
    pub color: &'static str,
}

/// One row of the recent orders table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub short_id: String,
    pub customer: String,
    pub total: String,
    pub date: String,
    pub status: String,
}

/// Everything the dashboard screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub cards: Vec<StatCard>,
    pub monthly_sales: Vec<SeriesPoint>,
    pub categories: Vec<CategoryShare>,
    pub top_products: Vec<TopProduct>,
    pub recent_orders: Vec<OrderRow>,
}

impl From<&Stats> for DashboardSummary {
    fn from(stats: &Stats) -> Self {
        let overview = &stats.overview;
        let cards = vec![
            StatCard {
                label: "Total Sales",
                value: money(overview.total_sales),
            },
            StatCard {
                label: "Orders",
                value: group_thousands(overview.total_orders),
            },
            StatCard {
                label: "Users",
                value: group_thousands(overview.total_users),
            },
            StatCard {
                label: "Products",
                value: group_thousands(overview.total_products),
            },
        ];

        let monthly_sales = stats
            .sales_by_month
            .iter()
            .map(|m| SeriesPoint {
                label: m.month.clone(),
                value: m.total,
            })
            .collect();

        let category_total: f64 = stats.sales_by_category.iter().map(|c| c.total).sum();
        let categories = stats
            .sales_by_category
            .iter()
            .enumerate()
            .map(|(i, c)| CategoryShare {
                category: c.category.clone(),
                total: c.total,
                percent: if category_total > 0.0 {
                    c.total / category_total * 100.0
                } else {
                    0.0
                },
                color: PALETTE[i % PALETTE.len()],
            })
            .collect();

        let recent_orders = stats
            .recent_orders
            .iter()
            .map(|order| OrderRow {
                short_id: format!("#{}", short_id(&order.id)),
                customer: order.user.name.clone(),
                total: money(order.total_amount),
                date: order.created_at.format("%Y-%m-%d").to_string(),
                status: order.status.clone(),
            })
            .collect();

        Self {
            cards,
            monthly_sales,
            categories,
            top_products: stats.top_products.clone(),
            recent_orders,
        }
    }
}

impl CategoryShare {
    pub fn percent_label(&self) -> String {
        percent(self.percent)
    }
}

/// Last eight characters of an order id
fn short_id(id: &str) -> &str {
    match id.char_indices().rev().nth(7) {
        Some((start, _)) => &id[start..],
        None => id,
    }
}
