//! End-to-end orchestration: load, combine, merge, analyze, plot

use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::data::{load_tables, DataSources};
use crate::food::{analyze_food_performance, FoodPerformance};
use crate::revenue::merge_revenue;
use crate::sales::combine_weeks;
use crate::segment::{analyze_segmentation, Segmentation};
use crate::viz::plot_top_items;

/// Inputs and output of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory holding the four input CSVs
    pub data_dir: PathBuf,
    /// Where the chart is written
    pub output: PathBuf,
    /// Items charted and listed, occupations kept
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output: PathBuf::from("top_5_food_revenue.png"),
            top_n: 5,
        }
    }
}

/// Everything a run computed, ready for presentation
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub total_orders: usize,
    pub unique_customers: usize,
    pub master_rows: usize,
    pub gross_revenue: f64,
    pub average_order_value: Option<f64>,
    pub matched_orders: usize,
    pub unmatched_orders: usize,
    /// Full ranking, best seller first
    pub food_performance: Vec<FoodPerformance>,
    pub segmentation: Segmentation,
    pub chart_path: PathBuf,
    pub bars_drawn: usize,
    pub top_n: usize,
}

/// Run the full report pipeline
///
/// Stops at the first error; a missing input file is reported as
/// `ReportError::MissingInput` before any stage runs or any chart is written.
pub fn run(config: &PipelineConfig) -> crate::Result<PipelineReport> {
    let start_time = Instant::now();

    let tables = load_tables(&DataSources::in_dir(&config.data_dir))?;

    let sales = combine_weeks(&tables.week1_sales, &tables.week2_sales)?;
    let revenue = merge_revenue(&sales, &tables.foods)?;
    let food_performance = analyze_food_performance(&revenue.master)?;
    let segmentation = analyze_segmentation(&revenue.master, &tables.customers, config.top_n)?;
    let bars_drawn = plot_top_items(&food_performance, &config.output, config.top_n)?;

    info!(
        elapsed_secs = start_time.elapsed().as_secs_f64(),
        "Pipeline complete"
    );

    Ok(PipelineReport {
        total_orders: sales.total_orders,
        unique_customers: sales.unique_customers,
        master_rows: revenue.master.height(),
        gross_revenue: revenue.gross_revenue,
        average_order_value: revenue.average_order_value,
        matched_orders: revenue.matched_orders,
        unmatched_orders: revenue.unmatched_orders,
        food_performance,
        segmentation,
        chart_path: config.output.clone(),
        bars_drawn,
        top_n: config.top_n,
    })
}
