use chrono::NaiveDate;

use crate::error::DashError;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse a date out of raw text. Accepted spellings, tried in order:
/// `2024-03-31`, `2024-03-31T12:00:00` / `2024-03-31 12:00:00` (time part
/// dropped), `2024/03/31`, `03/31/2024`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    // Datetime spellings: keep the calendar part only.
    if let Some(head) = s.split(['T', ' ']).next() {
        if head.len() != s.len() {
            if let Ok(d) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
                return Some(d);
            }
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Some(d);
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

/// Read a cell as a date, parsing string cells on the fly.
pub fn cell_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::String(s) => parse_date(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Column normalization
// ---------------------------------------------------------------------------

/// Return a copy of the dataset with `column` coerced to [`CellValue::Date`].
/// The input dataset is left untouched. Cells that do not parse become
/// [`CellValue::Null`].
///
/// Errors with [`DashError::ColumnNotFound`] if the column is absent and
/// [`DashError::NoDatesInColumn`] if nothing in it parses as a date.
pub fn normalize_date_column(dataset: &Dataset, column: &str) -> Result<Dataset, DashError> {
    if !dataset.has_column(column) {
        return Err(DashError::ColumnNotFound(column.to_string()));
    }

    let mut any_date = false;
    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if let Some(cell) = row.get_mut(column) {
                *cell = match cell_date(cell) {
                    Some(d) => {
                        any_date = true;
                        CellValue::Date(d)
                    }
                    None => CellValue::Null,
                };
            }
            row
        })
        .collect();

    if !any_date {
        return Err(DashError::NoDatesInColumn(column.to_string()));
    }
    Ok(Dataset::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_spellings() {
        assert_eq!(parse_date("2024-03-31"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("2024-03-31T00:00:00"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("2024-03-31 12:30:00"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("2024/03/31"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("03/31/2024"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_normalize_returns_copy_and_keeps_original() {
        let ds = Dataset::from_rows(vec![
            [(
                "valuation_date".to_string(),
                CellValue::String("2024-01-01".into()),
            )]
            .into_iter()
            .collect(),
            [(
                "valuation_date".to_string(),
                CellValue::String("junk".into()),
            )]
            .into_iter()
            .collect(),
        ]);

        let normalized = normalize_date_column(&ds, "valuation_date").unwrap();
        assert_eq!(
            *normalized.cell(0, "valuation_date"),
            CellValue::Date(d(2024, 1, 1))
        );
        assert!(normalized.cell(1, "valuation_date").is_null());

        // The caller's dataset is untouched.
        assert_eq!(
            *ds.cell(0, "valuation_date"),
            CellValue::String("2024-01-01".into())
        );
    }

    #[test]
    fn test_normalize_missing_column_errors() {
        let ds = Dataset::from_rows(vec![]);
        assert!(matches!(
            normalize_date_column(&ds, "NOT_A_COLUMN"),
            Err(DashError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_normalize_dateless_column_errors() {
        let ds = Dataset::from_rows(vec![[("x".to_string(), CellValue::Integer(3))]
            .into_iter()
            .collect()]);
        assert!(matches!(
            normalize_date_column(&ds, "x"),
            Err(DashError::NoDatesInColumn(_))
        ));
    }
}
