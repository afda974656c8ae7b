//! Month and weekday filtering for enriched trip tables
//!
//! Filters compare the derived `month` and `weekday` columns for equality.
//! The month filter runs first, then the weekday filter; because both are
//! plain equality checks on different columns the order does not change the
//! result. An empty result is valid and is passed on unchanged.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::dataset::TabularDataset;
//! use bikeshare_core::enrich::DatasetEnricher;
//! use bikeshare_core::filters::TripFilter;
//! use bikeshare_core::types::{FilterSpec, MonthChoice};
//! use chrono::Month;
//!
//! let csv = "Start Time,End Time\n\
//!            2017-01-03 08:00:00,2017-01-03 08:10:00\n\
//!            2017-02-03 08:00:00,2017-02-03 08:10:00\n";
//! let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
//! let trips = DatasetEnricher::new().enrich(table).unwrap();
//!
//! let january = TripFilter::new(FilterSpec::new().with_month(MonthChoice::Only(Month::January)));
//! assert_eq!(january.apply(&trips).row_count(), 1);
//! ```

use crate::dataset::RowView;
use crate::enrich::EnrichedDataset;
use crate::types::{FilterSpec, columns};
use tracing::debug;

/// Filter over the derived calendar columns
#[derive(Debug, Default, Clone, Copy)]
pub struct TripFilter {
    spec: FilterSpec,
}

impl TripFilter {
    pub fn new(spec: FilterSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Check if a row passes both constraints
    pub fn matches(&self, row: &RowView<'_>) -> bool {
        Self::matches_column(row, columns::MONTH, self.spec.month.number())
            && Self::matches_column(row, columns::WEEKDAY, self.spec.weekday.number())
    }

    fn matches_column(row: &RowView<'_>, column: &str, wanted: Option<u32>) -> bool {
        match wanted {
            None => true,
            Some(n) => row.integer(column) == Some(i64::from(n)),
        }
    }

    /// Apply the month filter, then the weekday filter
    ///
    /// Returns a new table; `dataset` is left untouched. The row count never
    /// grows.
    pub fn apply(&self, dataset: &EnrichedDataset) -> EnrichedDataset {
        debug!("Filter start: {} rows ({})", dataset.row_count(), self.spec);

        let mut current = dataset.clone();
        for (column, wanted) in [
            (columns::MONTH, self.spec.month.number()),
            (columns::WEEKDAY, self.spec.weekday.number()),
        ] {
            if wanted.is_none() {
                continue;
            }
            let keep: Vec<usize> = current
                .rows()
                .filter(|row| Self::matches_column(row, column, wanted))
                .map(|row| row.index())
                .collect();
            current = current.take(&keep);
            debug!("After '{}' filter: {} rows", column, current.row_count());
        }

        debug!("Filter stop: {} rows", current.row_count());
        current
    }
}
