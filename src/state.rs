use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use portdash::aggregate::AggFunc;
use portdash::data::filter::{FilterState, date_range_indices, filtered_indices};
use portdash::data::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state of the demo dashboard, independent of rendering.
pub struct DashboardState {
    /// Loaded dataset (None until the user loads a file).
    pub dataset: Option<Dataset>,

    /// Column holding valuation dates, detected at load time.
    pub date_column: Option<String>,

    /// Date-range widget state, seeded by the widget on first render.
    pub date_range: Option<(NaiveDate, NaiveDate)>,

    /// Categorical columns offered as sidebar filters.
    pub categorical_columns: Vec<String>,

    /// Multi-select widget state per categorical column (None = not yet
    /// seeded, the widget defaults it to "all selected").
    pub filters: BTreeMap<String, Option<BTreeSet<CellValue>>>,

    /// Numeric column fed into aggregation and the charts.
    pub value_column: Option<String>,

    /// Column whose distinct values become chart series / bar segments.
    pub group_column: Option<String>,

    /// Reducer applied per group.
    pub agg_func: AggFunc,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            dataset: None,
            date_column: None,
            date_range: None,
            categorical_columns: Vec::new(),
            filters: BTreeMap::new(),
            value_column: None,
            group_column: None,
            agg_func: AggFunc::default(),
            visible_indices: Vec::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl DashboardState {
    /// Ingest a newly loaded dataset: detect the date / value / categorical
    /// columns and reset every selection.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.date_column = detect_column(&dataset, |v| v.as_date().is_some());
        self.value_column = detect_column(&dataset, |v| v.as_f64().is_some());

        self.categorical_columns = dataset
            .column_names
            .iter()
            .filter(|col| Some(col.as_str()) != self.date_column.as_deref())
            .filter(|col| {
                dataset
                    .unique_values
                    .get(*col)
                    .is_some_and(|vals| vals.iter().any(|v| matches!(v, CellValue::String(_))))
            })
            .cloned()
            .collect();
        self.group_column = self.categorical_columns.first().cloned();

        self.filters = self
            .categorical_columns
            .iter()
            .map(|col| (col.clone(), None))
            .collect();
        self.date_range = None;
        self.visible_indices = (0..dataset.len()).collect();

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute `visible_indices` from the current widget selections:
    /// the date range intersected with every categorical filter.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };

        let mut filter_state = FilterState::new();
        for (col, selection) in &self.filters {
            if let Some(selected) = selection {
                filter_state.insert(col.clone(), selected.clone());
            }
        }
        let mut indices = filtered_indices(ds, &filter_state);

        if let (Some(col), Some((start, end))) = (&self.date_column, self.date_range) {
            let in_range: BTreeSet<usize> =
                date_range_indices(ds, col, start, end).into_iter().collect();
            indices.retain(|i| in_range.contains(i));
        }
        self.visible_indices = indices;
    }

    /// The filtered dataset the charts should see.
    pub fn visible_dataset(&self) -> Option<Dataset> {
        self.dataset
            .as_ref()
            .map(|ds| ds.select_rows(&self.visible_indices))
    }
}

/// First column (in order) with at least one distinct value matching the
/// predicate.
fn detect_column(dataset: &Dataset, pred: impl Fn(&CellValue) -> bool) -> Option<String> {
    dataset
        .column_names
        .iter()
        .find(|col| {
            dataset
                .unique_values
                .get(*col)
                .is_some_and(|vals| vals.iter().any(&pred))
        })
        .cloned()
}
