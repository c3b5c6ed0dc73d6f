use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::{CellValue, Dataset};

use super::{cell_x, is_date_axis, x_axis_date_label};

// ---------------------------------------------------------------------------
// Multi-series line chart
// ---------------------------------------------------------------------------

/// Render one line series per distinct value of `group_col`, each drawn with
/// connecting lines and point markers.
///
/// X and y values are taken directly from the columns; rows whose cells do
/// not map onto the axes are skipped. Legend entries are the group values;
/// axis labels are the column names themselves. No aggregation or sorting
/// happens here: pre-aggregate and pre-sort for a specific visual order.
pub fn line_chart(
    ui: &mut Ui,
    dataset: &Dataset,
    x_col: &str,
    y_col: &str,
    group_col: &str,
    title: &str,
) {
    let series = series_points(dataset, x_col, y_col, group_col);
    let color_map = dataset
        .unique_values
        .get(group_col)
        .map(ColorMap::new)
        .unwrap_or_else(|| ColorMap::new(&Default::default()));

    ui.strong(title);

    let mut plot = Plot::new(("line_chart", title.to_owned()))
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
        for (group_value, points) in &series {
            let color = color_map.color_for(group_value);
            let name = group_value.to_string();

            plot_ui.line(
                Line::new(PlotPoints::new(points.clone()))
                    .name(&name)
                    .color(color)
                    .width(1.5),
            );
            // Markers on every observation, not just the line.
            plot_ui.points(
                Points::new(points.clone())
                    .name(&name)
                    .color(color)
                    .radius(3.0),
            );
        }
    });
}

/// Split the dataset into one point series per distinct group value, in the
/// dataset's row order.
fn series_points(
    dataset: &Dataset,
    x_col: &str,
    y_col: &str,
    group_col: &str,
) -> BTreeMap<CellValue, Vec<[f64; 2]>> {
    let mut series: BTreeMap<CellValue, Vec<[f64; 2]>> = BTreeMap::new();
    for row in &dataset.rows {
        let Some(x) = row.get(x_col).and_then(cell_x) else {
            continue;
        };
        let Some(y) = row.get(y_col).and_then(CellValue::as_f64) else {
            continue;
        };
        let group = row.get(group_col).cloned().unwrap_or(CellValue::Null);
        series.entry(group).or_default().push([x, y]);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn dataset() -> Dataset {
        let rows: Vec<Row> = [
            ("1970-01-02", "Alpha", 100.0),
            ("1970-01-03", "Alpha", 110.0),
            ("1970-01-02", "Beta", 50.0),
            ("1970-01-02", "Beta", f64::NAN),
        ]
        .iter()
        .map(|(date, port, mv)| {
            let mv_cell = if mv.is_nan() {
                CellValue::Null
            } else {
                CellValue::Float(*mv)
            };
            [
                (
                    "valuation_date".to_string(),
                    CellValue::String((*date).into()),
                ),
                ("portfolio".to_string(), CellValue::String((*port).into())),
                ("market_value".to_string(), mv_cell),
            ]
            .into_iter()
            .collect()
        })
        .collect();
        Dataset::from_rows(rows)
    }

    #[test]
    fn test_one_series_per_group_value() {
        let series = series_points(&dataset(), "valuation_date", "market_value", "portfolio");
        assert_eq!(series.len(), 2);
        assert_eq!(series[&CellValue::String("Alpha".into())].len(), 2);
        // The null-valued row is skipped.
        assert_eq!(
            series[&CellValue::String("Beta".into())],
            vec![[1.0, 50.0]]
        );
    }

    #[test]
    fn test_values_taken_directly_from_columns() {
        let series = series_points(&dataset(), "valuation_date", "market_value", "portfolio");
        assert_eq!(
            series[&CellValue::String("Alpha".into())],
            vec![[1.0, 100.0], [2.0, 110.0]]
        );
    }
}
