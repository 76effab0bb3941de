//! Restaurant Report: a batch reporting pipeline over restaurant sales data
//!
//! This library loads weekly sales, the food menu and customer demographics,
//! joins them, computes revenue and segmentation summaries, and renders a bar
//! chart of the top-selling items.

pub mod cli;
pub mod data;
pub mod error;
pub mod food;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod revenue;
pub mod sales;
pub mod segment;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_tables, DataSources, Tables};
pub use error::ReportError;
pub use food::{analyze_food_performance, top_items, FoodPerformance};
pub use pipeline::{run, PipelineConfig, PipelineReport};
pub use revenue::{merge_revenue, RevenueSummary};
pub use sales::{combine_weeks, CombinedSales};
pub use segment::{analyze_segmentation, GenderRevenue, OccupationVolume, Segmentation};
pub use viz::plot_top_items;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
