//! Console presentation of a pipeline run

use std::fmt::Write;

use crate::food::top_items;
use crate::pipeline::PipelineReport;

/// Display name for sales whose food ID is not on the menu
pub const UNMATCHED_ITEM: &str = "(unmatched item)";
/// Display name for a missing gender or occupation
pub const UNKNOWN_SEGMENT: &str = "(unknown)";

pub fn item_label(item: Option<&str>) -> &str {
    item.unwrap_or(UNMATCHED_ITEM)
}

pub fn segment_label(segment: Option<&str>) -> &str {
    segment.unwrap_or(UNKNOWN_SEGMENT)
}

/// Format a dollar amount with thousands separators, e.g. `$1,234.50`
pub fn format_currency(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Rounding may turn a tiny negative into zero
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Render the human-readable summary of a run
pub fn render(report: &PipelineReport) -> String {
    let mut out = String::new();

    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &PipelineReport) -> std::fmt::Result {
    writeln!(out, "=== 1. Combined Sales ===")?;
    writeln!(out, "  > Total Combined Orders: {}", report.total_orders)?;
    writeln!(
        out,
        "  > Total Unique Customers Served: {}",
        report.unique_customers
    )?;

    writeln!(out, "\n=== 2. Revenue ===")?;
    writeln!(
        out,
        "  > Gross Total Revenue: {}",
        format_currency(report.gross_revenue, 2)
    )?;
    let aov = report
        .average_order_value
        .map(|aov| format_currency(aov, 2))
        .unwrap_or_else(|| "n/a".to_string());
    writeln!(out, "  > Average Order Value (AOV): {}", aov)?;
    if report.unmatched_orders > 0 {
        writeln!(
            out,
            "  > Orders without a menu price: {}",
            report.unmatched_orders
        )?;
    }

    writeln!(
        out,
        "\n=== 3. Top {} Food Items by Total Revenue ===",
        report.top_n
    )?;
    let top = top_items(&report.food_performance, report.top_n);
    let name_width = top
        .iter()
        .map(|f| item_label(f.item.as_deref()).len())
        .chain(std::iter::once("Food Item".len()))
        .max()
        .unwrap_or(0);
    writeln!(
        out,
        "  {:<name_width$} | {:>14} | {:>11}",
        "Food Item", "Total_Revenue", "Order_Count"
    )?;
    writeln!(out, "  {}-+-{}-+-{}", "-".repeat(name_width), "-".repeat(14), "-".repeat(11))?;
    for entry in top {
        writeln!(
            out,
            "  {:<name_width$} | {:>14} | {:>11}",
            item_label(entry.item.as_deref()),
            format_currency(entry.total_revenue, 2),
            entry.order_count
        )?;
    }

    writeln!(out, "\n=== 4. Customer Segmentation ===")?;
    writeln!(out, "Revenue Breakdown by Gender:")?;
    for segment in &report.segmentation.revenue_by_gender {
        writeln!(
            out,
            "  {:<12} {:>14}",
            segment_label(segment.gender.as_deref()),
            format_currency(segment.revenue, 2)
        )?;
    }

    writeln!(
        out,
        "\nTop {} Occupations Driving Order Volume:",
        report.top_n
    )?;
    for segment in &report.segmentation.top_occupations {
        writeln!(
            out,
            "  {:<20} {:>6}",
            segment_label(segment.occupation.as_deref()),
            segment.orders
        )?;
    }

    if report.segmentation.duplicated_rows > 0 {
        writeln!(
            out,
            "  > Rows duplicated by repeated customer IDs: {}",
            report.segmentation.duplicated_rows
        )?;
    }

    writeln!(out, "\n=== 5. Visualization ===")?;
    writeln!(
        out,
        "  > Chart with {} bars saved to: {}",
        report.bars_drawn,
        report.chart_path.display()
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::FoodPerformance;
    use crate::segment::{GenderRevenue, OccupationVolume, Segmentation};
    use std::path::PathBuf;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(35.0, 2), "$35.00");
        assert_eq!(format_currency(11.666_666, 2), "$11.67");
        assert_eq!(format_currency(1234567.891, 2), "$1,234,567.89");
        assert_eq!(format_currency(999.7, 0), "$1,000");
        assert_eq!(format_currency(100.0, 0), "$100");
        assert_eq!(format_currency(-2500.0, 2), "-$2,500.00");
        assert_eq!(format_currency(-0.001, 2), "$0.00");
        assert_eq!(format_currency(f64::NAN, 2), "n/a");
    }

    #[test]
    fn test_labels_for_missing_values() {
        assert_eq!(item_label(None), UNMATCHED_ITEM);
        assert_eq!(item_label(Some("Burger")), "Burger");
        assert_eq!(segment_label(None), UNKNOWN_SEGMENT);
    }

    #[test]
    fn test_render() {
        let report = PipelineReport {
            total_orders: 3,
            unique_customers: 2,
            master_rows: 3,
            gross_revenue: 35.0,
            average_order_value: Some(35.0 / 3.0),
            matched_orders: 3,
            unmatched_orders: 0,
            food_performance: vec![
                FoodPerformance {
                    item: Some("Burger".to_string()),
                    total_revenue: 20.0,
                    order_count: 2,
                },
                FoodPerformance {
                    item: Some("Pizza".to_string()),
                    total_revenue: 15.0,
                    order_count: 1,
                },
            ],
            segmentation: Segmentation {
                revenue_by_gender: vec![GenderRevenue {
                    gender: Some("Female".to_string()),
                    revenue: 35.0,
                }],
                top_occupations: vec![OccupationVolume {
                    occupation: None,
                    orders: 3,
                }],
                occupation_orders_total: 3,
                unmatched_customers: 3,
                duplicated_rows: 0,
            },
            chart_path: PathBuf::from("top_5_food_revenue.png"),
            bars_drawn: 2,
            top_n: 5,
        };

        let text = render(&report);

        assert!(text.contains("Total Combined Orders: 3"));
        assert!(text.contains("Total Unique Customers Served: 2"));
        assert!(text.contains("Gross Total Revenue: $35.00"));
        assert!(text.contains("Average Order Value (AOV): $11.67"));
        assert!(text.contains("Burger"));
        assert!(text.contains("$20.00"));
        assert!(text.contains(UNKNOWN_SEGMENT));
        assert!(text.contains("top_5_food_revenue.png"));
        assert!(!text.contains("without a menu price"));
    }
}
