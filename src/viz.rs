//! Bar chart of the top-selling items using Plotters

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

use crate::food::{top_items, FoodPerformance};
use crate::report::{format_currency, item_label};

/// One colour per bar, reused when more than five bars are requested
const BAR_COLORS: [RGBColor; 5] = [
    RGBColor(0x4A, 0x90, 0xE2),
    RGBColor(0x50, 0xE3, 0xC2),
    RGBColor(0xF5, 0xA6, 0x23),
    RGBColor(0xBD, 0x10, 0xE0),
    RGBColor(0x7E, 0xD3, 0x21),
];

const CHART_SIZE: (u32, u32) = (1000, 600);

/// Render the top items of a ranking as a bar chart
///
/// Any existing file at `output_path` is overwritten. When the ranking holds
/// fewer than `top_n` items, only those are drawn.
///
/// # Arguments
/// * `ranking` - Food performance, best seller first
/// * `output_path` - Path to save the PNG chart
/// * `top_n` - Maximum number of bars
///
/// # Returns
/// * Number of bars drawn
pub fn plot_top_items(
    ranking: &[FoodPerformance],
    output_path: &Path,
    top_n: usize,
) -> crate::Result<usize> {
    let top = top_items(ranking, top_n);
    let bars = top.len();

    let max_revenue = top.iter().map(|f| f.total_revenue).fold(0.0, f64::max);
    // Headroom for the value labels
    let y_max = if max_revenue > 0.0 {
        max_revenue * 1.15
    } else {
        1.0
    };

    let title = format!("Top {} Food Items by Total Revenue (2-Week Period)", top_n);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    // Integer ranges are inclusive, so 0..bars-1 yields one segment per bar
    let last_index = bars.saturating_sub(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(140)
        .y_label_area_size(80)
        .build_cartesian_2d((0..last_index).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(WHITE)
        .x_desc("Food Item")
        .y_desc("Total Revenue ($)")
        .axis_desc_style(("sans-serif", 15))
        .x_labels(bars.max(1))
        .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(index) => top
                .get(*index)
                .map(|entry| item_label(entry.item.as_deref()).to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|value| format_currency(*value, 0))
        .draw()?;

    for (index, entry) in top.iter().enumerate() {
        let color = BAR_COLORS[index % BAR_COLORS.len()];
        let right = if index + 1 < bars {
            SegmentValue::Exact(index + 1)
        } else {
            SegmentValue::Last
        };

        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(index), 0.0), (right, entry.total_revenue)],
            color.filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        chart.draw_series(std::iter::once(bar))?;

        // Revenue label just above the bar
        let label_style = TextStyle::from(("sans-serif", 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(std::iter::once(Text::new(
            format_currency(entry.total_revenue, 0),
            (SegmentValue::CenterOf(index), entry.total_revenue),
            label_style,
        )))?;
    }

    root.present()?;
    info!(path = %output_path.display(), bars, "Top items chart saved");

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ranking(entries: &[(&str, f64, u64)]) -> Vec<FoodPerformance> {
        entries
            .iter()
            .map(|&(item, total_revenue, order_count)| FoodPerformance {
                item: Some(item.to_string()),
                total_revenue,
                order_count,
            })
            .collect()
    }

    #[test]
    fn test_plot_top_items() {
        let ranking = ranking(&[
            ("Sushi", 1250.0, 50),
            ("Steak", 980.5, 20),
            ("Pasta", 640.0, 32),
            ("Salad", 300.0, 30),
            ("Soup", 120.0, 24),
            ("Bread", 40.0, 40),
        ]);
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("top.png");

        let bars = plot_top_items(&ranking, &output_path, 5).unwrap();

        assert_eq!(bars, 5);
        assert!(output_path.exists());
    }

    #[test]
    fn test_fewer_items_than_requested() {
        let ranking = ranking(&[("Burger", 20.0, 2), ("Pizza", 15.0, 1)]);
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("two.png");

        let bars = plot_top_items(&ranking, &output_path, 5).unwrap();

        assert_eq!(bars, 2);
        assert!(output_path.exists());
    }

    #[test]
    fn test_empty_ranking_writes_empty_chart() {
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("empty.png");

        let bars = plot_top_items(&[], &output_path, 5).unwrap();

        assert_eq!(bars, 0);
        assert!(output_path.exists());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let ranking = ranking(&[("Burger", 20.0, 2)]);
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("chart.png");
        std::fs::write(&output_path, b"stale").unwrap();

        plot_top_items(&ranking, &output_path, 5).unwrap();

        let written = std::fs::read(&output_path).unwrap();
        assert_ne!(written, b"stale");
        // PNG signature
        assert_eq!(&written[..4], &[0x89, b'P', b'N', b'G']);
    }
}
