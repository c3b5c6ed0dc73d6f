//! Reusable helper components for an interactive analytics dashboard over a
//! caller-owned tabular dataset.
//!
//! The pieces compose in caller order, nothing here holds state between
//! calls:
//!
//! 1. load or build a [`data::model::Dataset`],
//! 2. render the sidebar widgets ([`widgets::date_range_slider`],
//!    [`widgets::multi_select`]) to obtain filter criteria,
//! 3. apply the criteria with [`data::filter`],
//! 4. reduce with [`aggregate::group_by`],
//! 5. draw the result with [`charts::line_chart`] /
//!    [`charts::stacked_bar_chart`].
//!
//! The binary target in `src/main.rs` is a small demo dashboard doing
//! exactly that.

pub mod aggregate;
pub mod charts;
pub mod color;
pub mod data;
pub mod error;
pub mod widgets;

pub use aggregate::{AggFunc, Aggregated, group_by};
pub use data::model::{CellValue, Dataset, Row};
pub use error::DashError;
