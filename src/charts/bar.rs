use std::collections::BTreeMap;

use chrono::NaiveDate;
use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Text};

use crate::color::ColorMap;
use crate::data::dates::cell_date;
use crate::data::model::{CellValue, Dataset};

use super::{cell_x, date_to_x, format_thousands, is_date_axis, x_axis_date_label};

// ---------------------------------------------------------------------------
// Stacked bar chart with an end-of-period total annotation
// ---------------------------------------------------------------------------

/// One stacked segment: a group's contribution at one x position.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    x: f64,
    group: CellValue,
    value: f64,
    /// Sum of the segments stacked underneath this one.
    offset: f64,
}

/// Render a stacked bar chart: one bar per x position, segmented by
/// `group_col`, each segment labeled with its own value. A single text
/// annotation `Total: <sum>` is drawn at `(end_date, total)` where `total`
/// is the y-column sum over rows whose x cell equals `end_date` exactly.
/// Rows on other dates never contribute; if nothing matches, the annotation
/// silently reads `Total: 0`.
pub fn stacked_bar_chart(
    ui: &mut Ui,
    dataset: &Dataset,
    x_col: &str,
    y_col: &str,
    group_col: &str,
    end_date: NaiveDate,
    title: &str,
) {
    let segments = stack_segments(dataset, x_col, y_col, group_col);
    let color_map = dataset
        .unique_values
        .get(group_col)
        .map(ColorMap::new)
        .unwrap_or_else(|| ColorMap::new(&Default::default()));

    let total = total_for_date(dataset, x_col, y_col, end_date);
    let width = bar_width(&segments);

    // One BarChart per group so every group gets its own legend entry.
    let mut by_group: BTreeMap<CellValue, Vec<Bar>> = BTreeMap::new();
    for seg in &segments {
        by_group.entry(seg.group.clone()).or_default().push(
            Bar::new(seg.x, seg.value)
                .base_offset(seg.offset)
                .width(width),
        );
    }

    ui.strong(title);

    let mut plot = Plot::new(("stacked_bar_chart", title.to_owned()))
        .legend(Legend::default())
        .x_axis_label(x_col.to_owned())
        .y_axis_label(y_col.to_owned())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if is_date_axis(dataset.distinct(x_col)) {
        plot = plot.x_axis_formatter(|mark, _range| x_axis_date_label(mark.value));
    }

    plot.show(ui, |plot_ui| {
        for (group_value, bars) in by_group {
            let color = color_map.color_for(&group_value);
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(group_value.to_string())
                    .color(color),
            );
        }

        // Each segment shows its own value as text, centered in the segment.
        for seg in &segments {
            if seg.value == 0.0 {
                continue;
            }
            plot_ui.text(
                Text::new(
                    PlotPoint::new(seg.x, seg.offset + seg.value / 2.0),
                    RichText::new(format_thousands(seg.value)).size(10.0),
                )
                .anchor(Align2::CENTER_CENTER),
            );
        }

        plot_ui.text(
            Text::new(
                PlotPoint::new(date_to_x(end_date), total),
                RichText::new(total_label(total)).size(14.0).strong(),
            )
            .anchor(Align2::CENTER_BOTTOM),
        );
    });
}

/// The annotation text for the end-of-period total.
fn total_label(total: f64) -> String {
    format!("Total: {}", format_thousands(total))
}

/// Sum the y column over rows whose x cell equals `date` exactly.
fn total_for_date(dataset: &Dataset, x_col: &str, y_col: &str, date: NaiveDate) -> f64 {
    dataset
        .rows
        .iter()
        .filter(|row| row.get(x_col).and_then(cell_date) == Some(date))
        .filter_map(|row| row.get(y_col).and_then(CellValue::as_f64))
        .sum()
}

/// Lay the rows out as stacked segments, accumulating a base offset per x
/// position in row order.
fn stack_segments(
    dataset: &Dataset,
    x_col: &str,
    y_col: &str,
    group_col: &str,
) -> Vec<Segment> {
    let mut stack_height: BTreeMap<CellValue, f64> = BTreeMap::new();
    let mut segments = Vec::new();

    for row in &dataset.rows {
        let Some(x_cell) = row.get(x_col) else {
            continue;
        };
        let Some(x) = cell_x(x_cell) else {
            continue;
        };
        let Some(value) = row.get(y_col).and_then(CellValue::as_f64) else {
            continue;
        };
        let group = row.get(group_col).cloned().unwrap_or(CellValue::Null);

        let offset = stack_height.entry(x_cell.clone()).or_insert(0.0);
        segments.push(Segment {
            x,
            group,
            value,
            offset: *offset,
        });
        *offset += value;
    }
    segments
}

/// Bar width in x units: 80% of the smallest gap between distinct x
/// positions, so neighbouring stacks don't touch.
fn bar_width(segments: &[Segment]) -> f64 {
    let mut xs: Vec<f64> = segments.iter().map(|s| s.x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    let gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    if gap.is_finite() { gap * 0.8 } else { 0.8 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dataset() -> Dataset {
        let rows: Vec<Row> = [
            ("2024-02-29", "Alpha", 90.0),
            ("2024-03-31", "Alpha", 100.0),
            ("2024-03-31", "Beta", 200.0),
        ]
        .iter()
        .map(|(date, port, mv)| {
            [
                (
                    "valuation_date".to_string(),
                    CellValue::String((*date).into()),
                ),
                ("portfolio".to_string(), CellValue::String((*port).into())),
                ("market_value".to_string(), CellValue::Float(*mv)),
            ]
            .into_iter()
            .collect()
        })
        .collect();
        Dataset::from_rows(rows)
    }

    #[test]
    fn test_total_annotation_sums_only_the_end_date() {
        let ds = dataset();
        let total = total_for_date(&ds, "valuation_date", "market_value", d(2024, 3, 31));
        assert_eq!(total, 300.0);
        assert_eq!(total_label(total), "Total: 300");
    }

    #[test]
    fn test_total_is_silently_zero_without_matches() {
        let ds = dataset();
        let total = total_for_date(&ds, "valuation_date", "market_value", d(2025, 1, 1));
        assert_eq!(total, 0.0);
        assert_eq!(total_label(total), "Total: 0");
    }

    #[test]
    fn test_segments_stack_per_x_position() {
        let ds = dataset();
        let segments = stack_segments(&ds, "valuation_date", "market_value", "portfolio");
        assert_eq!(segments.len(), 3);

        let x = date_to_x(d(2024, 3, 31));
        let at_end: Vec<&Segment> = segments.iter().filter(|s| s.x == x).collect();
        assert_eq!(at_end[0].offset, 0.0);
        assert_eq!(at_end[1].offset, 100.0);
        assert_eq!(at_end[1].offset + at_end[1].value, 300.0);
    }

    #[test]
    fn test_bar_width_follows_smallest_gap() {
        let ds = dataset();
        let segments = stack_segments(&ds, "valuation_date", "market_value", "portfolio");
        // The two stacks sit 31 days apart.
        assert_eq!(bar_width(&segments), 31.0 * 0.8);
    }
}
