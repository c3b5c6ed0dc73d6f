use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use portdash::aggregate::AggFunc;
use portdash::data::loader;
use portdash::widgets::{date_range_slider, multi_select};

use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Left side panel – filter and aggregation widgets
// ---------------------------------------------------------------------------

/// Render the left sidebar: date range, categorical filters, aggregation
/// settings.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Filters");
    ui.separator();

    // Clone so the widgets can mutate selection state inside the loop.
    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            if let Some(date_column) = state.date_column.clone() {
                if date_range_slider(
                    ui,
                    &dataset,
                    &date_column,
                    "Select Date Range",
                    &mut state.date_range,
                )
                .is_err()
                {
                    // The widget already painted the error; drop the stale
                    // column so we stop asking every frame.
                    state.date_column = None;
                }
                ui.separator();
            }

            // ---- Per-column categorical filters ----
            for column in state.categorical_columns.clone() {
                let Some(selection) = state.filters.get_mut(&column) else {
                    continue;
                };
                multi_select(ui, &dataset, &column, &column, selection);
            }
            ui.separator();

            // ---- Aggregation settings ----
            ui.strong("Aggregate");
            let numeric_columns: Vec<String> = dataset
                .column_names
                .iter()
                .filter(|col| {
                    dataset
                        .unique_values
                        .get(*col)
                        .is_some_and(|vals| vals.iter().any(|v| v.as_f64().is_some()))
                })
                .cloned()
                .collect();

            column_picker(ui, "Value column", &numeric_columns, &mut state.value_column);
            column_picker(
                ui,
                "Group by",
                &state.categorical_columns.clone(),
                &mut state.group_column,
            );

            ui.horizontal(|ui: &mut Ui| {
                ui.label("Function");
                let current = state.agg_func;
                egui::ComboBox::from_id_salt("agg_func")
                    .selected_text(current.name())
                    .show_ui(ui, |ui: &mut Ui| {
                        for func in AggFunc::ALL {
                            if ui
                                .selectable_label(current == func, func.name())
                                .clicked()
                            {
                                state.agg_func = func;
                            }
                        }
                    });
            });
        });

    // Recompute visible indices after any selection changes.
    state.refilter();
}

/// A labelled single-column picker.
fn column_picker(ui: &mut Ui, label: &str, options: &[String], current: &mut Option<String>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        let selected_text = current.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt(label.to_owned())
            .selected_text(selected_text)
            .show_ui(ui, |ui: &mut Ui| {
                for col in options {
                    if ui
                        .selectable_label(current.as_deref() == Some(col.as_str()), col)
                        .clicked()
                    {
                        *current = Some(col.clone());
                    }
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut DashboardState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
