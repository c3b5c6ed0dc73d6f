/// Data layer: core types, loading, dates, and filtering.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Row>, column index, distinct values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply selections → filtered indices
///   └──────────┘
/// ```
///
/// Date handling lives in [`dates`]: parsing, plus a pure
/// column-normalization pass that returns a copy instead of mutating the
/// caller's dataset.

pub mod dates;
pub mod filter;
pub mod loader;
pub mod model;
