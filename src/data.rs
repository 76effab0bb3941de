//! Loading of the sales, food and customer tables using Polars

use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ReportError;

/// Join key shared by sales and customer records
pub const CUSTOMER_ID: &str = "Customer ID";
/// Join key shared by sales and food records
pub const FOOD_ID: &str = "Food ID";
/// Week tag added to each sale by the combiner
pub const WEEK: &str = "Week";
pub const FOOD_ITEM: &str = "Food Item";
pub const PRICE: &str = "Price";
pub const GENDER: &str = "Gender";
pub const OCCUPATION: &str = "Occupation";

pub const WEEK1_SALES_FILE: &str = "Restaurant - Week 1 Sales.csv";
pub const WEEK2_SALES_FILE: &str = "Restaurant - Week 2 Sales.csv";
pub const FOODS_FILE: &str = "restaurant_foods.csv";
pub const CUSTOMERS_FILE: &str = "restaurant_customers.csv";

/// A column rename that aligns a reference table with a join key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMapping {
    pub from: &'static str,
    pub to: &'static str,
}

/// The customers table names its identity column `ID`; sales call it `Customer ID`
pub const CUSTOMER_KEY_MAPPING: KeyMapping = KeyMapping {
    from: "ID",
    to: CUSTOMER_ID,
};

/// Locations of the four input tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub week1_sales: PathBuf,
    pub week2_sales: PathBuf,
    pub foods: PathBuf,
    pub customers: PathBuf,
}

impl DataSources {
    /// Standard file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            week1_sales: dir.join(WEEK1_SALES_FILE),
            week2_sales: dir.join(WEEK2_SALES_FILE),
            foods: dir.join(FOODS_FILE),
            customers: dir.join(CUSTOMERS_FILE),
        }
    }

    fn paths(&self) -> [&Path; 4] {
        [
            &self.week1_sales,
            &self.week2_sales,
            &self.foods,
            &self.customers,
        ]
    }
}

/// The four loaded and normalized tables
#[derive(Debug, Clone)]
pub struct Tables {
    /// `Customer ID`, `Food ID` (both strings)
    pub week1_sales: DataFrame,
    /// `Customer ID`, `Food ID` (both strings)
    pub week2_sales: DataFrame,
    /// `Food ID`, `Food Item`, `Price` (f64)
    pub foods: DataFrame,
    /// `Customer ID`, `Gender`, `Occupation` plus any other demographics
    pub customers: DataFrame,
}

/// Load all four input tables
///
/// Every path is checked before any file is parsed, so a missing file yields
/// `ReportError::MissingInput` and no partial result.
///
/// # Arguments
/// * `sources` - Paths of the input CSV files
///
/// # Returns
/// * `Tables` with join keys normalized to string columns
pub fn load_tables(sources: &DataSources) -> crate::Result<Tables> {
    info!("Collecting data and getting it ready for use");

    for path in sources.paths() {
        if !path.is_file() {
            return Err(ReportError::MissingInput {
                file: path.display().to_string(),
            }
            .into());
        }
    }

    let week1_sales = prepare_sales(read_csv(&sources.week1_sales)?, "week 1 sales")?;
    let week2_sales = prepare_sales(read_csv(&sources.week2_sales)?, "week 2 sales")?;
    let foods = prepare_foods(read_csv(&sources.foods)?)?;
    let customers = prepare_customers(read_csv(&sources.customers)?, &week1_sales)?;

    info!(
        week1 = week1_sales.height(),
        week2 = week2_sales.height(),
        foods = foods.height(),
        customers = customers.height(),
        "All four data sources loaded"
    );

    Ok(Tables {
        week1_sales,
        week2_sales,
        foods,
        customers,
    })
}

/// Read a comma-separated file with a header row
pub fn read_csv(path: &Path) -> crate::Result<DataFrame> {
    debug!(path = %path.display(), "Reading CSV");

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(df)
}

/// Fail with `MissingColumn` for the first absent column
pub fn require_columns(df: &DataFrame, table: &str, columns: &[&str]) -> crate::Result<()> {
    for &column in columns {
        if df.column(column).is_err() {
            return Err(ReportError::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Rename `mapping.from` to `mapping.to` in `df`
///
/// The source column must exist in `df`, the target must not, and the target
/// must be a column of `join_target` so the later join has a shared key.
pub fn apply_key_mapping(
    mut df: DataFrame,
    mapping: KeyMapping,
    table: &str,
    join_target: &DataFrame,
) -> crate::Result<DataFrame> {
    let fail = |reason: &str| -> anyhow::Error {
        ReportError::KeyMapping {
            table: table.to_string(),
            from: mapping.from.to_string(),
            to: mapping.to.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    if df.column(mapping.from).is_err() {
        return Err(fail("source column not present"));
    }
    if df.column(mapping.to).is_ok() {
        return Err(fail("target column already exists"));
    }
    if join_target.column(mapping.to).is_err() {
        return Err(fail("target is not a column of the joined table"));
    }

    df.rename(mapping.from, mapping.to.into())?;
    // In-place rename leaves the cached schema under the old name
    let df = DataFrame::new(df.get_columns().to_vec())?;
    debug!(table, from = mapping.from, to = mapping.to, "Applied key mapping");

    Ok(df)
}

/// Keep the sales join keys, as strings
fn prepare_sales(df: DataFrame, table: &str) -> crate::Result<DataFrame> {
    require_columns(&df, table, &[CUSTOMER_ID, FOOD_ID])?;

    let df = df
        .lazy()
        .select([
            col(CUSTOMER_ID).cast(DataType::String),
            col(FOOD_ID).cast(DataType::String),
        ])
        .collect()?;

    Ok(df)
}

fn prepare_foods(df: DataFrame) -> crate::Result<DataFrame> {
    require_columns(&df, "foods", &[FOOD_ID, FOOD_ITEM, PRICE])?;

    let df = df
        .lazy()
        .select([
            col(FOOD_ID).cast(DataType::String),
            col(FOOD_ITEM).cast(DataType::String),
            // Unparseable prices fail the load instead of becoming null
            col(PRICE).strict_cast(DataType::Float64),
        ])
        .collect()?;

    Ok(df)
}

/// Apply the customer key mapping and normalize the segment columns
fn prepare_customers(df: DataFrame, sales: &DataFrame) -> crate::Result<DataFrame> {
    let df = apply_key_mapping(df, CUSTOMER_KEY_MAPPING, "customers", sales)?;
    require_columns(&df, "customers", &[CUSTOMER_ID, GENDER, OCCUPATION])?;

    let df = df
        .lazy()
        .with_columns([
            col(CUSTOMER_ID).cast(DataType::String),
            col(GENDER).cast(DataType::String),
            col(OCCUPATION).cast(DataType::String),
        ])
        .collect()?;

    Ok(df)
}

/// First value of a numeric column as `u64`; zero when the value is null
pub(crate) fn first_u64(df: &DataFrame, name: &str) -> crate::Result<u64> {
    let column = df.column(name)?.cast(&DataType::UInt64)?;
    Ok(column.as_materialized_series().u64()?.get(0).unwrap_or(0))
}

/// First value of a numeric column as `f64`, if present and non-null
pub(crate) fn first_f64(df: &DataFrame, name: &str) -> crate::Result<Option<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.as_materialized_series().f64()?.get(0))
}

pub(crate) fn string_values(df: &DataFrame, name: &str) -> crate::Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

pub(crate) fn f64_values(df: &DataFrame, name: &str) -> crate::Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.as_materialized_series().f64()?.into_iter().collect())
}

pub(crate) fn u64_values(df: &DataFrame, name: &str) -> crate::Result<Vec<u64>> {
    let column = df.column(name)?.cast(&DataType::UInt64)?;
    let values = column
        .as_materialized_series()
        .u64()?
        .into_iter()
        .map(|value| value.unwrap_or(0))
        .collect();
    Ok(values)
}
