//! Customer segmentation: revenue by gender and order volume by occupation

use polars::prelude::*;
use tracing::{info, warn};

use crate::data::{
    f64_values, first_u64, string_values, u64_values, CUSTOMER_ID, GENDER, OCCUPATION, PRICE,
};

const REVENUE: &str = "Revenue";
const ORDERS: &str = "Orders";
const MATCHED: &str = "__customer_matched";

#[derive(Debug, Clone, PartialEq)]
pub struct GenderRevenue {
    /// `None` for customers without a demographics record or gender
    pub gender: Option<String>,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupationVolume {
    /// `None` for customers without a demographics record or occupation
    pub occupation: Option<String>,
    pub orders: u64,
}

/// Derived segmentation views over the master records
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Revenue per gender, highest first
    pub revenue_by_gender: Vec<GenderRevenue>,
    /// Most active occupations by order count, truncated to the requested size
    pub top_occupations: Vec<OccupationVolume>,
    /// Order count across every occupation bucket before truncation
    pub occupation_orders_total: u64,
    /// Master rows whose customer had no demographics record
    pub unmatched_customers: usize,
    /// Extra rows introduced by duplicate `Customer ID`s in the demographics
    pub duplicated_rows: usize,
}

/// Join master records with customer demographics and summarize by segment
///
/// Missing demographics are kept as their own `None` bucket in both views,
/// so revenue and order counts reconcile with the master records.
///
/// # Arguments
/// * `master` - Sales joined with food prices
/// * `customers` - Customer reference table keyed by `Customer ID`
/// * `top_n` - Number of occupations to keep
pub fn analyze_segmentation(
    master: &DataFrame,
    customers: &DataFrame,
    top_n: usize,
) -> crate::Result<Segmentation> {
    let joined = join_customers(master, customers)?;

    let duplicated_rows = joined.height().saturating_sub(master.height());
    if duplicated_rows > 0 {
        warn!(
            before = master.height(),
            after = joined.height(),
            "Customer join changed the row count; customer IDs are not unique"
        );
    }

    let unmatched = joined
        .clone()
        .lazy()
        .select([col(MATCHED).null_count().alias("unmatched")])
        .collect()?;
    let unmatched_customers = first_u64(&unmatched, "unmatched")? as usize;
    if unmatched_customers > 0 {
        warn!(
            unmatched_customers,
            "Sales reference customers without demographics; grouped as unknown"
        );
    }

    let revenue_by_gender = revenue_by_gender(&joined)?;
    let mut top_occupations = orders_by_occupation(&joined)?;
    let occupation_orders_total = top_occupations.iter().map(|o| o.orders).sum();
    top_occupations.truncate(top_n);

    info!(
        genders = revenue_by_gender.len(),
        occupations = top_occupations.len(),
        "Customer segmentation computed"
    );

    Ok(Segmentation {
        revenue_by_gender,
        top_occupations,
        occupation_orders_total,
        unmatched_customers,
        duplicated_rows,
    })
}

/// Left join on `Customer ID`, marking rows that found a customer
fn join_customers(master: &DataFrame, customers: &DataFrame) -> crate::Result<DataFrame> {
    let customers = customers
        .clone()
        .lazy()
        .with_column(lit(true).alias(MATCHED));

    let joined = master
        .clone()
        .lazy()
        .join(
            customers,
            [col(CUSTOMER_ID)],
            [col(CUSTOMER_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    Ok(joined)
}

/// Sum of price per gender, highest first, ties by gender name
pub fn revenue_by_gender(joined: &DataFrame) -> crate::Result<Vec<GenderRevenue>> {
    let grouped = joined
        .clone()
        .lazy()
        .group_by([col(GENDER)])
        .agg([col(PRICE).sum().alias(REVENUE)])
        .sort_by_exprs(
            [col(REVENUE), col(GENDER)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_nulls_last(true),
        )
        .collect()?;

    let genders = string_values(&grouped, GENDER)?;
    let revenues = f64_values(&grouped, REVENUE)?;

    Ok(genders
        .into_iter()
        .zip(revenues)
        .map(|(gender, revenue)| GenderRevenue {
            gender,
            revenue: revenue.unwrap_or(0.0),
        })
        .collect())
}

/// Row count per occupation, highest first, ties by occupation name
pub fn orders_by_occupation(joined: &DataFrame) -> crate::Result<Vec<OccupationVolume>> {
    let grouped = joined
        .clone()
        .lazy()
        .group_by([col(OCCUPATION)])
        .agg([len().alias(ORDERS)])
        .sort_by_exprs(
            [col(ORDERS), col(OCCUPATION)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_nulls_last(true),
        )
        .collect()?;

    let occupations = string_values(&grouped, OCCUPATION)?;
    let orders = u64_values(&grouped, ORDERS)?;

    Ok(occupations
        .into_iter()
        .zip(orders)
        .map(|(occupation, orders)| OccupationVolume { occupation, orders })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> DataFrame {
        df!(
            CUSTOMER_ID => ["C1", "C2", "C1", "C3", "C4", "C9"],
            PRICE => [Some(10.0), Some(15.0), Some(10.0), Some(8.0), None, Some(4.0)]
        )
        .unwrap()
    }

    fn customers() -> DataFrame {
        df!(
            CUSTOMER_ID => ["C1", "C2", "C3", "C4"],
            GENDER => ["Female", "Male", "Female", "Male"],
            OCCUPATION => ["Engineer", "Teacher", "Artist", "Engineer"]
        )
        .unwrap()
    }

    #[test]
    fn test_revenue_by_gender() {
        let segmentation = analyze_segmentation(&master(), &customers(), 5).unwrap();

        assert_eq!(
            segmentation.revenue_by_gender,
            vec![
                GenderRevenue {
                    gender: Some("Female".to_string()),
                    revenue: 28.0,
                },
                GenderRevenue {
                    gender: Some("Male".to_string()),
                    revenue: 15.0,
                },
                GenderRevenue {
                    gender: None,
                    revenue: 4.0,
                },
            ]
        );

        // Gender revenue reconciles with gross revenue
        let total: f64 = segmentation.revenue_by_gender.iter().map(|g| g.revenue).sum();
        assert!((total - 47.0).abs() < 1e-9);
        assert_eq!(segmentation.unmatched_customers, 1);
    }

    #[test]
    fn test_orders_by_occupation() {
        let segmentation = analyze_segmentation(&master(), &customers(), 5).unwrap();

        assert_eq!(
            segmentation.top_occupations,
            vec![
                OccupationVolume {
                    occupation: Some("Engineer".to_string()),
                    orders: 3,
                },
                OccupationVolume {
                    occupation: Some("Artist".to_string()),
                    orders: 1,
                },
                OccupationVolume {
                    occupation: Some("Teacher".to_string()),
                    orders: 1,
                },
                OccupationVolume {
                    occupation: None,
                    orders: 1,
                },
            ]
        );
        assert_eq!(segmentation.occupation_orders_total, 6);
    }

    #[test]
    fn test_duplicate_customer_key_is_reported() {
        let master = df!(CUSTOMER_ID => ["C1", "C2"], PRICE => [10.0, 15.0]).unwrap();
        let customers = df!(
            CUSTOMER_ID => ["C1", "C1", "C2"],
            GENDER => ["Female", "Female", "Male"],
            OCCUPATION => ["Engineer", "Engineer", "Teacher"]
        )
        .unwrap();

        let segmentation = analyze_segmentation(&master, &customers, 5).unwrap();

        assert_eq!(segmentation.duplicated_rows, 1);
        assert_eq!(segmentation.occupation_orders_total, 3);
    }

    #[test]
    fn test_unique_customer_keys_do_not_duplicate() {
        let segmentation = analyze_segmentation(&master(), &customers(), 5).unwrap();

        assert_eq!(segmentation.duplicated_rows, 0);
    }

    #[test]
    fn test_gender_ties_break_on_name() {
        let master = df!(
            CUSTOMER_ID => ["C1", "C2", "C3"],
            PRICE => [12.0, 12.0, 12.0]
        )
        .unwrap();
        let customers = df!(
            CUSTOMER_ID => ["C1", "C2", "C3"],
            GENDER => ["Male", "Nonbinary", "Female"],
            OCCUPATION => ["Teacher", "Artist", "Chef"]
        )
        .unwrap();

        let segmentation = analyze_segmentation(&master, &customers, 5).unwrap();

        let genders: Vec<_> = segmentation
            .revenue_by_gender
            .iter()
            .map(|g| g.gender.clone().unwrap())
            .collect();
        assert_eq!(genders, vec!["Female", "Male", "Nonbinary"]);

        let occupations: Vec<_> = segmentation
            .top_occupations
            .iter()
            .map(|o| o.occupation.clone().unwrap())
            .collect();
        assert_eq!(occupations, vec!["Artist", "Chef", "Teacher"]);
    }

    #[test]
    fn test_occupations_truncated_after_counting() {
        let segmentation = analyze_segmentation(&master(), &customers(), 2).unwrap();

        assert_eq!(segmentation.top_occupations.len(), 2);
        assert_eq!(segmentation.occupation_orders_total, 6);
        assert_eq!(
            segmentation.top_occupations[0].occupation.as_deref(),
            Some("Engineer")
        );
    }
}
