//! Per-item revenue and order volume ranking

use polars::prelude::*;
use tracing::{debug, info};

use crate::data::{f64_values, string_values, u64_values, FOOD_ITEM, PRICE};

pub const TOTAL_REVENUE: &str = "Total_Revenue";
pub const ORDER_COUNT: &str = "Order_Count";

/// Revenue and order volume of a single menu item
#[derive(Debug, Clone, PartialEq)]
pub struct FoodPerformance {
    /// Item name; `None` collects sales whose food ID had no menu entry
    pub item: Option<String>,
    pub total_revenue: f64,
    pub order_count: u64,
}

/// Group master records by `Food Item` and rank by total revenue
///
/// Ordering is revenue descending, then item name ascending, with the
/// unmatched (null) item last among equal revenues.
///
/// # Arguments
/// * `master` - Sales joined with food prices
///
/// # Returns
/// * One `FoodPerformance` per distinct item, best seller first
pub fn analyze_food_performance(master: &DataFrame) -> crate::Result<Vec<FoodPerformance>> {
    let summary = master
        .clone()
        .lazy()
        .group_by([col(FOOD_ITEM)])
        .agg([
            col(PRICE).sum().alias(TOTAL_REVENUE),
            len().alias(ORDER_COUNT),
        ])
        .sort_by_exprs(
            [col(TOTAL_REVENUE), col(FOOD_ITEM)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_nulls_last(true),
        )
        .collect()?;

    debug!(groups = summary.height(), "Grouped master records by item");

    let items = string_values(&summary, FOOD_ITEM)?;
    let revenues = f64_values(&summary, TOTAL_REVENUE)?;
    let counts = u64_values(&summary, ORDER_COUNT)?;

    let ranking: Vec<FoodPerformance> = items
        .into_iter()
        .zip(revenues)
        .zip(counts)
        .map(|((item, revenue), order_count)| FoodPerformance {
            item,
            total_revenue: revenue.unwrap_or(0.0),
            order_count,
        })
        .collect();

    if let Some(best) = ranking.first() {
        info!(
            items = ranking.len(),
            top_item = best.item.as_deref().unwrap_or("(unmatched)"),
            top_revenue = best.total_revenue,
            "Food performance ranked"
        );
    }

    Ok(ranking)
}

/// The first `n` entries of a ranking (fewer if the ranking is shorter)
pub fn top_items(ranking: &[FoodPerformance], n: usize) -> &[FoodPerformance] {
    &ranking[..n.min(ranking.len())]
}
