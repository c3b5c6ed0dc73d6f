use eframe::egui::{Ui, vec2};

use portdash::aggregate::group_by;
use portdash::charts::{line_chart, stacked_bar_chart};

use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Render the aggregated line chart and stacked bar chart in the central
/// panel.
pub fn charts_panel(ui: &mut Ui, state: &DashboardState) {
    let Some(dataset) = state.visible_dataset() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore it  (File → Open…)");
        });
        return;
    };

    let (Some(date_column), Some(value_column), Some(group_column)) = (
        state.date_column.clone(),
        state.value_column.clone(),
        state.group_column.clone(),
    ) else {
        ui.label("The dashboard needs a date column, a numeric value column and a categorical group column.");
        return;
    };

    // One grouping pass feeds both charts: per date, per group value.
    let group_cols = vec![date_column.clone(), group_column.clone()];
    let aggregated = match group_by(&dataset, &group_cols, &value_column, state.agg_func) {
        Ok(agg) => agg,
        Err(e) => {
            ui.label(format!("Cannot aggregate: {e}"));
            return;
        }
    };

    let Some((_, end_date)) = state.date_range else {
        ui.label("Waiting for the date range selector.");
        return;
    };

    let half = ui.available_height() / 2.0;
    let width = ui.available_width();
    let title = format!("{} by {} ({})", value_column, group_column, state.agg_func);

    ui.allocate_ui(vec2(width, half), |ui: &mut Ui| {
        line_chart(
            ui,
            &aggregated.data,
            &date_column,
            &value_column,
            &group_column,
            &title,
        );
    });
    ui.allocate_ui(vec2(width, half), |ui: &mut Ui| {
        stacked_bar_chart(
            ui,
            &aggregated.data,
            &date_column,
            &value_column,
            &group_column,
            end_date,
            &title,
        );
    });
}
