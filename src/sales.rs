//! Combining the two weekly sales tables into one record set

use polars::prelude::*;
use tracing::info;

use crate::data::{first_u64, CUSTOMER_ID, WEEK};

/// Unified sales records with their headline counts
#[derive(Debug, Clone)]
pub struct CombinedSales {
    /// `Customer ID`, `Food ID`, `Week`; week 1 rows first
    pub frame: DataFrame,
    /// Number of rows across both weeks
    pub total_orders: usize,
    /// Distinct `Customer ID` values across both weeks
    pub unique_customers: usize,
}

/// Tag each weekly table with its week number and concatenate them
///
/// Rows are neither deduplicated nor reconciled between weeks.
///
/// # Arguments
/// * `week1` - Week 1 sales (`Customer ID`, `Food ID`)
/// * `week2` - Week 2 sales, same columns
pub fn combine_weeks(week1: &DataFrame, week2: &DataFrame) -> crate::Result<CombinedSales> {
    let frame = concat(
        [tag_week(week1, 1), tag_week(week2, 2)],
        UnionArgs::default(),
    )?
    .collect()?;

    let unique = frame
        .clone()
        .lazy()
        .select([col(CUSTOMER_ID).n_unique().alias("unique_customers")])
        .collect()?;

    let combined = CombinedSales {
        total_orders: frame.height(),
        unique_customers: first_u64(&unique, "unique_customers")? as usize,
        frame,
    };

    info!(
        total_orders = combined.total_orders,
        unique_customers = combined.unique_customers,
        "Combined weekly sales"
    );

    Ok(combined)
}

fn tag_week(sales: &DataFrame, week: i32) -> LazyFrame {
    sales.clone().lazy().with_column(lit(week).alias(WEEK))
}
