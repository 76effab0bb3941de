//! Command-line interface definitions and argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::PipelineConfig;

/// Restaurant sales report: revenue, top sellers and customer segments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the week 1/week 2 sales, foods and customers CSVs
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Output path for the top items bar chart
    #[arg(short, long, default_value = "top_5_food_revenue.png")]
    pub output: PathBuf,

    /// Number of items (and occupations) to show in the rankings and chart
    #[arg(short, long, default_value = "5")]
    pub top: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the library-level configuration from parsed arguments
    pub fn pipeline_config(&self) -> crate::Result<PipelineConfig> {
        if self.top == 0 {
            anyhow::bail!("--top must be at least 1");
        }

        Ok(PipelineConfig {
            data_dir: self.data_dir.clone(),
            output: self.output.clone(),
            top_n: self.top,
        })
    }
}
