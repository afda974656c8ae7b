//! Core types, tabular dataset, enrichment and filters for bikeshare
//!
//! This crate provides the foundational types, error handling, the
//! in-memory trip table and the month/weekday filter used by all other
//! bikeshare crates. Nothing here performs terminal I/O.

pub mod dataset;
pub mod enrich;
pub mod error;
pub mod filters;
pub mod input;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use dataset::{Cell, ColumnData, GroupKey, NOT_AVAILABLE, TabularDataset};
pub use enrich::{DatasetEnricher, EnrichedDataset};
pub use error::{BikeshareError, Result};
pub use filters::TripFilter;
pub use types::{City, FilterSpec, MonthChoice, WeekdayChoice};
