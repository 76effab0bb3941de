//! Joining sales to menu prices and computing revenue metrics

use polars::prelude::*;
use tracing::{info, warn};

use crate::data::{first_f64, first_u64, FOOD_ID, PRICE};
use crate::sales::CombinedSales;

/// Master record set with its revenue metrics
#[derive(Debug, Clone)]
pub struct RevenueSummary {
    /// Sales left-joined to foods: `Customer ID`, `Food ID`, `Week`, `Food Item`, `Price`
    pub master: DataFrame,
    /// Sum of all non-null prices
    pub gross_revenue: f64,
    /// Mean price over matched rows; `None` when no sale matched a food
    pub average_order_value: Option<f64>,
    /// Rows whose `Food ID` found a price
    pub matched_orders: usize,
    /// Rows left with a null price by the join
    pub unmatched_orders: usize,
}

/// Left-join sales onto food records and compute gross revenue and AOV
///
/// Every sales row is kept; unmatched `Food ID`s leave `Food Item` and `Price`
/// null. Null prices are excluded from both the sum and the mean.
///
/// # Arguments
/// * `sales` - Combined weekly sales
/// * `foods` - Food reference table (`Food ID`, `Food Item`, `Price`)
pub fn merge_revenue(sales: &CombinedSales, foods: &DataFrame) -> crate::Result<RevenueSummary> {
    let master = sales
        .frame
        .clone()
        .lazy()
        .join(
            foods.clone().lazy(),
            [col(FOOD_ID)],
            [col(FOOD_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    if master.height() != sales.total_orders {
        warn!(
            before = sales.total_orders,
            after = master.height(),
            "Food join changed the row count; food IDs are not unique"
        );
    }

    let metrics = master
        .clone()
        .lazy()
        .select([
            col(PRICE).sum().alias("gross_revenue"),
            col(PRICE).null_count().alias("unmatched"),
        ])
        .collect()?;

    let gross_revenue = first_f64(&metrics, "gross_revenue")?.unwrap_or(0.0);
    let unmatched_orders = first_u64(&metrics, "unmatched")? as usize;
    let matched_orders = master.height() - unmatched_orders;

    if unmatched_orders > 0 {
        warn!(
            unmatched_orders,
            "Sales have no menu price (unmatched food ID); their price is excluded"
        );
    }

    let average_order_value = if matched_orders > 0 {
        Some(gross_revenue / matched_orders as f64)
    } else {
        None
    };

    info!(
        gross_revenue,
        average_order_value = average_order_value.unwrap_or(f64::NAN),
        "Revenue calculated"
    );

    Ok(RevenueSummary {
        master,
        gross_revenue,
        average_order_value,
        matched_orders,
        unmatched_orders,
    })
}
