//! Dashboard aggregates computed from the in-memory orders

use std::collections::{BTreeMap, HashMap};

use super::state::Store;
use crate::client::{
    CategorySales, MonthlySales, OrderCustomer, Overview, RecentOrder, Stats, TopProduct,
};

const TOP_PRODUCTS: usize = 5;
const RECENT_ORDERS: usize = 5;

pub(crate) fn compute_stats(store: &Store) -> Stats {
    let overview = Overview {
        total_sales: store.orders.iter().map(|o| o.total_amount).sum(),
        total_orders: store.orders.len() as u64,
        total_users: store.accounts.len() as u64,
        total_products: store.products.len() as u64,
    };

    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for order in &store.orders {
        *by_month
            .entry(order.created_at.format("%Y-%m").to_string())
            .or_default() += order.total_amount;
    }
    let sales_by_month = by_month
        .into_iter()
        .map(|(month, total)| MonthlySales { month, total })
        .collect();

    let categories: HashMap<&str, &str> = store
        .products
        .iter()
        .map(|p| (p.id.as_str(), p.category.as_str()))
        .collect();
    let mut by_category: HashMap<&str, f64> = HashMap::new();
    for item in store.orders.iter().flat_map(|o| &o.items) {
        let category = categories
            .get(item.product_id.as_str())
            .copied()
            .unwrap_or("uncategorized");
        *by_category.entry(category).or_default() += item.price * item.quantity as f64;
    }
    let mut sales_by_category: Vec<CategorySales> = by_category
        .into_iter()
        .map(|(category, total)| CategorySales {
            category: category.to_string(),
            total,
        })
        .collect();
    sales_by_category.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    let mut ranked: Vec<_> = store.products.iter().collect();
    ranked.sort_by(|a, b| b.sold.cmp(&a.sold).then_with(|| a.name.cmp(&b.name)));
    let top_products = ranked
        .into_iter()
        .take(TOP_PRODUCTS)
        .map(|p| TopProduct {
            name: p.name.clone(),
            sold: p.sold,
        })
        .collect();

    let mut recent: Vec<_> = store.orders.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_orders = recent
        .into_iter()
        .take(RECENT_ORDERS)
        .map(|order| RecentOrder {
            id: order.id.clone(),
            user: OrderCustomer {
                name: store
                    .accounts
                    .iter()
                    .find(|a| a.id == order.user_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| "Deleted user".to_string()),
            },
            total_amount: order.total_amount,
            created_at: order.created_at,
            status: order.status.clone(),
        })
        .collect();

    Stats {
        overview,
        sales_by_month,
        sales_by_category,
        top_products,
        recent_orders,
    }
}
