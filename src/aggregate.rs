use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::{CellValue, Dataset, Row};
use crate::error::DashError;

// ---------------------------------------------------------------------------
// Aggregation functions
// ---------------------------------------------------------------------------

/// The closed set of supported reducers. Parsing an unknown name fails with
/// [`DashError::UnsupportedAggregation`] instead of a lookup failure deep in
/// the grouping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl AggFunc {
    pub const ALL: [AggFunc; 5] = [
        AggFunc::Sum,
        AggFunc::Mean,
        AggFunc::Count,
        AggFunc::Min,
        AggFunc::Max,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AggFunc::Sum => "sum",
            AggFunc::Mean => "mean",
            AggFunc::Count => "count",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
        }
    }
}

impl Default for AggFunc {
    fn default() -> Self {
        AggFunc::Sum
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggFunc {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(AggFunc::Sum),
            "mean" => Ok(AggFunc::Mean),
            "count" => Ok(AggFunc::Count),
            "min" => Ok(AggFunc::Min),
            "max" => Ok(AggFunc::Max),
            other => Err(DashError::UnsupportedAggregation(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Group-by
// ---------------------------------------------------------------------------

/// The result of a grouping pass: the aggregated dataset plus the column
/// names echoed back for caller convenience.
#[derive(Debug, Clone)]
pub struct Aggregated {
    /// The aggregated column name.
    pub y_column: String,
    /// One row per distinct combination of the grouping columns.
    pub data: Dataset,
    /// The grouping columns, in the order given.
    pub group_columns: Vec<String>,
}

/// Per-bucket accumulator. Sum/Mean/Min/Max reduce the numeric view of the
/// cells; Count counts non-null cells.
#[derive(Default)]
struct Bucket {
    sum: f64,
    numeric_count: usize,
    non_null_count: usize,
    min: Option<f64>,
    max: Option<f64>,
}

impl Bucket {
    fn push(&mut self, cell: &CellValue) {
        if !cell.is_null() {
            self.non_null_count += 1;
        }
        if let Some(v) = cell.as_f64() {
            self.sum += v;
            self.numeric_count += 1;
            self.min = Some(self.min.map_or(v, |m| m.min(v)));
            self.max = Some(self.max.map_or(v, |m| m.max(v)));
        }
    }

    fn reduce(&self, func: AggFunc) -> CellValue {
        match func {
            AggFunc::Sum => CellValue::Float(self.sum),
            AggFunc::Mean => {
                if self.numeric_count == 0 {
                    CellValue::Null
                } else {
                    CellValue::Float(self.sum / self.numeric_count as f64)
                }
            }
            AggFunc::Count => CellValue::Integer(self.non_null_count as i64),
            AggFunc::Min => self.min.map(CellValue::Float).unwrap_or(CellValue::Null),
            AggFunc::Max => self.max.map(CellValue::Float).unwrap_or(CellValue::Null),
        }
    }
}

/// Group `dataset` by the distinct value combinations of `group_cols` and
/// reduce `y_col` within each bucket.
///
/// Output columns are exactly `group_cols + [y_col]`; row order follows the
/// sorted group keys and is not otherwise meaningful. Referencing a column
/// the dataset lacks fails with [`DashError::ColumnNotFound`].
pub fn group_by(
    dataset: &Dataset,
    group_cols: &[String],
    y_col: &str,
    func: AggFunc,
) -> Result<Aggregated, DashError> {
    for col in group_cols.iter().map(String::as_str).chain([y_col]) {
        if !dataset.has_column(col) {
            return Err(DashError::ColumnNotFound(col.to_string()));
        }
    }

    let mut buckets: BTreeMap<Vec<CellValue>, Bucket> = BTreeMap::new();
    for row in &dataset.rows {
        let key: Vec<CellValue> = group_cols
            .iter()
            .map(|col| row.get(col).cloned().unwrap_or(CellValue::Null))
            .collect();
        buckets
            .entry(key)
            .or_default()
            .push(row.get(y_col).unwrap_or(&CellValue::Null));
    }

    let rows: Vec<Row> = buckets
        .into_iter()
        .map(|(key, bucket)| {
            let mut row: Row = group_cols
                .iter()
                .cloned()
                .zip(key)
                .collect();
            row.insert(y_col.to_string(), bucket.reduce(func));
            row
        })
        .collect();

    Ok(Aggregated {
        y_column: y_col.to_string(),
        data: Dataset::from_rows(rows),
        group_columns: group_cols.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let rows: Vec<Row> = [
            ("2024-01-01", "A", 100.0),
            ("2024-01-01", "B", 50.0),
            ("2024-01-02", "A", 110.0),
            ("2024-01-02", "B", 55.0),
            ("2024-01-02", "B", 5.0),
        ]
        .iter()
        .map(|(date, port, mv)| {
            [
                ("DATE".to_string(), CellValue::String((*date).into())),
                ("PORT".to_string(), CellValue::String((*port).into())),
                ("MV".to_string(), CellValue::Float(*mv)),
            ]
            .into_iter()
            .collect()
        })
        .collect();
        Dataset::from_rows(rows)
    }

    fn mv_for(agg: &Aggregated, date: &str, port: Option<&str>) -> CellValue {
        for i in 0..agg.data.len() {
            let date_matches = *agg.data.cell(i, "DATE") == CellValue::String(date.into());
            let port_matches = match port {
                Some(p) => *agg.data.cell(i, "PORT") == CellValue::String(p.into()),
                None => true,
            };
            if date_matches && port_matches {
                return agg.data.cell(i, "MV").clone();
            }
        }
        CellValue::Null
    }

    #[test]
    fn test_sum_by_single_column() {
        let agg = group_by(&dataset(), &["DATE".to_string()], "MV", AggFunc::Sum).unwrap();
        assert_eq!(agg.y_column, "MV");
        assert_eq!(agg.group_columns, vec!["DATE".to_string()]);
        assert_eq!(agg.data.len(), 2);
        assert_eq!(mv_for(&agg, "2024-01-01", None), CellValue::Float(150.0));
        assert_eq!(mv_for(&agg, "2024-01-02", None), CellValue::Float(170.0));
    }

    #[test]
    fn test_one_row_per_combination() {
        let cols = vec!["DATE".to_string(), "PORT".to_string()];
        let agg = group_by(&dataset(), &cols, "MV", AggFunc::Sum).unwrap();
        assert_eq!(agg.data.len(), 4);
        assert_eq!(
            mv_for(&agg, "2024-01-02", Some("B")),
            CellValue::Float(60.0)
        );
    }

    #[test]
    fn test_all_reducers() {
        let cols = vec!["PORT".to_string()];
        let ds = dataset();
        let by = |f: AggFunc| group_by(&ds, &cols, "MV", f).unwrap();

        let find = |agg: &Aggregated, port: &str| -> CellValue {
            (0..agg.data.len())
                .find(|&i| *agg.data.cell(i, "PORT") == CellValue::String(port.into()))
                .map(|i| agg.data.cell(i, "MV").clone())
                .unwrap()
        };

        assert_eq!(find(&by(AggFunc::Sum), "B"), CellValue::Float(110.0));
        assert_eq!(find(&by(AggFunc::Mean), "A"), CellValue::Float(105.0));
        assert_eq!(find(&by(AggFunc::Count), "B"), CellValue::Integer(3));
        assert_eq!(find(&by(AggFunc::Min), "B"), CellValue::Float(5.0));
        assert_eq!(find(&by(AggFunc::Max), "A"), CellValue::Float(110.0));
    }

    #[test]
    fn test_idempotent_on_unchanged_dataset() {
        let ds = dataset();
        let cols = vec!["DATE".to_string()];
        let a = group_by(&ds, &cols, "MV", AggFunc::Sum).unwrap();
        let b = group_by(&ds, &cols, "MV", AggFunc::Sum).unwrap();
        assert_eq!(a.data.rows, b.data.rows);
    }

    #[test]
    fn test_missing_column_errors() {
        let err = group_by(&dataset(), &["NOPE".to_string()], "MV", AggFunc::Sum).unwrap_err();
        assert_eq!(err, DashError::ColumnNotFound("NOPE".to_string()));

        let err = group_by(&dataset(), &["DATE".to_string()], "NOPE", AggFunc::Sum).unwrap_err();
        assert_eq!(err, DashError::ColumnNotFound("NOPE".to_string()));
    }

    #[test]
    fn test_agg_func_parsing() {
        assert_eq!("sum".parse::<AggFunc>().unwrap(), AggFunc::Sum);
        assert_eq!("mean".parse::<AggFunc>().unwrap(), AggFunc::Mean);
        assert_eq!(
            "median".parse::<AggFunc>().unwrap_err(),
            DashError::UnsupportedAggregation("median".to_string())
        );
    }
}
