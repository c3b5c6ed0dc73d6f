use chrono::NaiveDate;
use eframe::egui::{Color32, Ui};
use egui_extras::DatePickerButton;
use serde::{Deserialize, Serialize};

use crate::data::dates::cell_date;
use crate::data::model::Dataset;
use crate::error::DashError;

// ---------------------------------------------------------------------------
// Date-range selector
// ---------------------------------------------------------------------------

/// The user's chosen inclusive date range, plus the column it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeSelection {
    pub column: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Min/max dates present in a column.
///
/// Errors with [`DashError::ColumnNotFound`] if the column is absent and
/// [`DashError::NoDatesInColumn`] if no cell holds or parses as a date.
pub fn date_bounds(dataset: &Dataset, column: &str) -> Result<(NaiveDate, NaiveDate), DashError> {
    if !dataset.has_column(column) {
        return Err(DashError::ColumnNotFound(column.to_string()));
    }

    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for row in &dataset.rows {
        if let Some(d) = row.get(column).and_then(cell_date) {
            bounds = Some(match bounds {
                None => (d, d),
                Some((min, max)) => (min.min(d), max.max(d)),
            });
        }
    }
    bounds.ok_or_else(|| DashError::NoDatesInColumn(column.to_string()))
}

/// Render a date-range selection control seeded from the min/max of
/// `date_column`.
///
/// On first use (or when the remembered range falls outside the data) the
/// selection defaults to the full `[min, max]` span. The pickers are clamped
/// into that span and kept ordered, so the returned bounds always satisfy
/// `start <= end`. The caller owns `selection` and applies the range itself;
/// the dataset is never modified.
///
/// A missing column paints an error label and returns
/// [`DashError::ColumnNotFound`]; nothing else is rendered for that call.
pub fn date_range_slider(
    ui: &mut Ui,
    dataset: &Dataset,
    date_column: &str,
    label: &str,
    selection: &mut Option<(NaiveDate, NaiveDate)>,
) -> Result<DateRangeSelection, DashError> {
    ui.strong(label);

    let (min, max) = match date_bounds(dataset, date_column) {
        Ok(bounds) => bounds,
        Err(e) => {
            log::error!("date range selector: {e}");
            ui.colored_label(Color32::RED, e.to_string());
            return Err(e);
        }
    };

    let (mut start, mut end) = match *selection {
        Some((s, e)) if s >= min && e <= max => (s, e),
        _ => (min, max),
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut start).id_salt(&format!("{date_column}_start")));
        ui.label("to");
        ui.add(DatePickerButton::new(&mut end).id_salt(&format!("{date_column}_end")));
    });
    ui.label(format!("Data: {min} to {max}"));

    // The pickers allow any calendar date; keep the choice inside the data
    // span and ordered.
    start = start.clamp(min, max);
    end = end.clamp(min, max);
    if end < start {
        end = start;
    }
    *selection = Some((start, end));

    Ok(DateRangeSelection {
        column: date_column.to_string(),
        start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dataset() -> Dataset {
        let rows = ["2024-02-15", "2024-01-01", "2024-03-31"]
            .iter()
            .map(|date| {
                [(
                    "VALUATION_DATE_FULL".to_string(),
                    CellValue::String((*date).into()),
                )]
                .into_iter()
                .collect()
            })
            .collect();
        Dataset::from_rows(rows)
    }

    #[test]
    fn test_bounds_span_the_column() {
        let (min, max) = date_bounds(&dataset(), "VALUATION_DATE_FULL").unwrap();
        assert_eq!(min, d(2024, 1, 1));
        assert_eq!(max, d(2024, 3, 31));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        assert_eq!(
            date_bounds(&dataset(), "NOT_A_COLUMN").unwrap_err(),
            DashError::ColumnNotFound("NOT_A_COLUMN".to_string())
        );
    }

    #[test]
    fn test_dateless_column_is_an_error() {
        let ds = Dataset::from_rows(vec![[("n".to_string(), CellValue::Integer(1))]
            .into_iter()
            .collect()]);
        assert_eq!(
            date_bounds(&ds, "n").unwrap_err(),
            DashError::NoDatesInColumn("n".to_string())
        );
    }
}
