//! Chart renderers: a multi-series line chart and a stacked bar chart with
//! an end-of-period total annotation. Both draw the dataset exactly as
//! given; callers pre-filter and pre-aggregate (see [`crate::aggregate`]).
//!
//! Dates are placed on the x axis as whole days since 1970-01-01 with an
//! axis formatter that prints `YYYY-MM-DD`; numeric columns pass through
//! unchanged.

pub mod bar;
pub mod line;

pub use bar::stacked_bar_chart;
pub use line::line_chart;

use chrono::NaiveDate;

use crate::data::dates::cell_date;
use crate::data::model::CellValue;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

/// Map a date to its x-axis position (whole days since the epoch).
pub(crate) fn date_to_x(d: NaiveDate) -> f64 {
    (d - epoch()).num_days() as f64
}

/// Map a cell to an x-axis position: dates (and date-looking strings)
/// become day numbers, numeric cells pass through.
pub(crate) fn cell_x(value: &CellValue) -> Option<f64> {
    if let Some(d) = cell_date(value) {
        return Some(date_to_x(d));
    }
    value.as_f64()
}

/// Whether a column's cells land on the day-number axis, deciding if the
/// date formatter is installed.
pub(crate) fn is_date_axis(values: impl IntoIterator<Item = CellValue>) -> bool {
    values.into_iter().any(|v| cell_date(&v).is_some())
}

/// Format an x-axis position produced by [`date_to_x`] back into a date.
pub(crate) fn x_axis_date_label(x: f64) -> String {
    epoch()
        .checked_add_signed(chrono::Duration::days(x.round() as i64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Round to whole units and insert thousands separators: `1234567.4` →
/// `"1,234,567"`.
pub(crate) fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_axis_round_trip() {
        let date = d(2024, 3, 31);
        let x = date_to_x(date);
        assert_eq!(x_axis_date_label(x), "2024-03-31");
        assert_eq!(date_to_x(d(1970, 1, 1)), 0.0);
    }

    #[test]
    fn test_cell_x_dates_and_numbers() {
        assert_eq!(
            cell_x(&CellValue::Date(d(1970, 1, 11))),
            Some(10.0)
        );
        assert_eq!(
            cell_x(&CellValue::String("1970-01-11".into())),
            Some(10.0)
        );
        assert_eq!(cell_x(&CellValue::Float(2.5)), Some(2.5));
        assert_eq!(cell_x(&CellValue::String("Alpha".into())), None);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(300.0), "300");
        assert_eq!(format_thousands(1234567.4), "1,234,567");
        assert_eq!(format_thousands(-9876.6), "-9,877");
        assert_eq!(format_thousands(0.2), "0");
    }
}
