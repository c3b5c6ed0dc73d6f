//! Sidebar filter widgets: a date-range selector and a categorical
//! multi-select. Both render into the `Ui` they are given and hand the
//! chosen criteria back to the caller; applying the criteria to the data is
//! the caller's job (see [`crate::data::filter`]).

pub mod date_range;
pub mod multi_select;

pub use date_range::{DateRangeSelection, date_bounds, date_range_slider};
pub use multi_select::{CategoricalSelection, multi_select};
