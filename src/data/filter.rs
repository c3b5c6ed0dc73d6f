use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::dates::cell_date;
use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// An empty set means "nothing selected" and hides every row; a column
/// absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, BTreeSet<CellValue>>;

/// Initialise a [`FilterState`] for the given columns with all values
/// selected (i.e., show everything).
pub fn init_filter_state(dataset: &Dataset, columns: &[String]) -> FilterState {
    columns
        .iter()
        .filter_map(|col| {
            dataset
                .unique_values
                .get(col)
                .map(|vals| (col.clone(), vals.clone()))
        })
        .collect()
}

/// Return indices of rows that pass all active categorical filters.
///
/// A row passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            for (col, selected) in filters {
                if selected.is_empty() {
                    // Nothing selected for this column → hide everything
                    return false;
                }
                // Check all unique values are selected → no effective filter
                if let Some(all_vals) = dataset.unique_values.get(col) {
                    if selected.len() == all_vals.len() {
                        continue; // everything selected, no filtering needed
                    }
                }
                match row.get(col) {
                    Some(val) => {
                        if !selected.contains(val) {
                            return false;
                        }
                    }
                    None => {
                        // row doesn't have this column → include only if Null is selected
                        if !selected.contains(&CellValue::Null) {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of rows whose date cell in `column` lies in the inclusive
/// `[start, end]` range. Rows whose cell is not a date never match.
pub fn date_range_indices(
    dataset: &Dataset,
    column: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.get(column)
                .and_then(cell_date)
                .is_some_and(|d| d >= start && d <= end)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn dataset() -> Dataset {
        let rows: Vec<Row> = [
            ("2024-01-01", "Alpha", 100.0),
            ("2024-02-01", "Beta", 50.0),
            ("2024-03-31", "Alpha", 200.0),
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
    fn test_init_filter_state_selects_everything() {
        let ds = dataset();
        let filters = init_filter_state(&ds, &["portfolio".to_string()]);
        assert_eq!(filters["portfolio"].len(), 2);
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn test_subset_filters_rows() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds, &["portfolio".to_string()]);
        filters
            .get_mut("portfolio")
            .unwrap()
            .remove(&CellValue::String("Beta".into()));
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 2]);
    }

    #[test]
    fn test_empty_selection_hides_all_rows() {
        let ds = dataset();
        let mut filters = FilterState::new();
        filters.insert("portfolio".to_string(), BTreeSet::new());
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let ds = dataset();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(
            date_range_indices(&ds, "valuation_date", start, end),
            vec![0, 1]
        );
    }

    #[test]
    fn test_date_range_on_non_date_column_matches_nothing() {
        let ds = dataset();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(date_range_indices(&ds, "market_value", start, end).is_empty());
    }
}
