use std::collections::BTreeSet;

use eframe::egui::{self, RichText, Ui};
use serde::{Deserialize, Serialize};

use crate::data::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Categorical multi-select
// ---------------------------------------------------------------------------

/// The user's chosen subset of a column's distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalSelection {
    pub column: String,
    pub label: String,
    /// Sorted subset of the column's distinct values. May be empty.
    pub selected: Vec<CellValue>,
}

/// Render a multi-choice control over the distinct values of `column`.
///
/// The caller owns `selection`; on first use (`None`) it is seeded with all
/// values selected. The column is assumed to exist — an unknown name just
/// yields an empty option list. Deselecting everything is allowed; what an
/// empty subset means downstream is the caller's concern.
pub fn multi_select(
    ui: &mut Ui,
    dataset: &Dataset,
    column: &str,
    label: &str,
    selection: &mut Option<BTreeSet<CellValue>>,
) -> CategoricalSelection {
    let options = dataset.distinct(column);
    let selected = selection.get_or_insert_with(|| options.iter().cloned().collect());

    // Values can disappear when the caller swaps datasets.
    selected.retain(|v| options.contains(v));

    let header_text = format!("{label}  ({}/{})", selected.len(), options.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            // Select all / none buttons
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = options.iter().cloned().collect();
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for val in &options {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    if checked {
                        selected.insert(val.clone());
                    } else {
                        selected.remove(val);
                    }
                }
            }
        });

    CategoricalSelection {
        column: column.to_string(),
        label: label.to_string(),
        selected: selected.iter().cloned().collect(),
    }
}
