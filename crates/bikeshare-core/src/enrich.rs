//! Schema validation and derived calendar columns
//!
//! [`DatasetEnricher::enrich`] is the only way to obtain an
//! [`EnrichedDataset`]; holding one guarantees that `Start Time` and
//! `End Time` are parsed timestamp columns and that the derived `month`,
//! `weekday` and `hour` columns exist for every row.

use crate::dataset::{ColumnData, TabularDataset};
use crate::error::{BikeshareError, Result};
use crate::types::columns;
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use std::ops::Deref;
use tracing::debug;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a trip timestamp
///
/// RFC 3339 values keep their local wall-clock time; the offset is dropped so
/// that calendar columns match what the rider saw.
///
/// ```
/// use bikeshare_core::enrich::parse_timestamp;
/// use chrono::Timelike;
///
/// assert_eq!(parse_timestamp("2017-01-01 09:07:57").unwrap().hour(), 9);
/// assert_eq!(parse_timestamp("2017-01-01T23:30:00-05:00").unwrap().hour(), 23);
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// A schema-checked table with derived calendar columns
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDataset {
    table: TabularDataset,
}

impl EnrichedDataset {
    pub fn table(&self) -> &TabularDataset {
        &self.table
    }

    pub fn into_inner(self) -> TabularDataset {
        self.table
    }

    /// Keep the rows at `indices`; derived columns stay consistent
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            table: self.table.take(indices),
        }
    }
}

impl Deref for EnrichedDataset {
    type Target = TabularDataset;

    fn deref(&self) -> &TabularDataset {
        &self.table
    }
}

impl AsRef<TabularDataset> for EnrichedDataset {
    fn as_ref(&self) -> &TabularDataset {
        &self.table
    }
}

/// Validates the minimum schema and derives `month`, `weekday`, `hour`
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetEnricher;

impl DatasetEnricher {
    /// Columns that must be present before anything is derived
    pub const REQUIRED_COLUMNS: [&'static str; 2] = [columns::START_TIME, columns::END_TIME];

    pub fn new() -> Self {
        Self
    }

    /// Check the schema, parse both timestamp columns and add derived columns
    ///
    /// # Errors
    ///
    /// * `Schema` if `Start Time` or `End Time` is absent
    /// * `Parse` on the first missing or unparseable timestamp; no rows are
    ///   dropped, the whole table is rejected
    pub fn enrich(&self, table: TabularDataset) -> Result<EnrichedDataset> {
        for column in Self::REQUIRED_COLUMNS {
            if !table.has_column(column) {
                return Err(BikeshareError::missing_column(column));
            }
        }

        let start = Self::parse_column(&table, columns::START_TIME)?;
        let end = Self::parse_column(&table, columns::END_TIME)?;

        let month = start.iter().map(|ts| Some(i64::from(ts.month()))).collect();
        let weekday = start
            .iter()
            .map(|ts| Some(i64::from(ts.weekday().num_days_from_monday())))
            .collect();
        let hour = start.iter().map(|ts| Some(i64::from(ts.hour()))).collect();

        let table = table
            .with_column(
                columns::START_TIME,
                ColumnData::Timestamp(start.into_iter().map(Some).collect()),
            )?
            .with_column(
                columns::END_TIME,
                ColumnData::Timestamp(end.into_iter().map(Some).collect()),
            )?
            .with_column(columns::MONTH, ColumnData::Integer(month))?
            .with_column(columns::WEEKDAY, ColumnData::Integer(weekday))?
            .with_column(columns::HOUR, ColumnData::Integer(hour))?;

        debug!("Enriched {} rows with calendar columns", table.row_count());
        Ok(EnrichedDataset { table })
    }

    fn parse_column(table: &TabularDataset, column: &str) -> Result<Vec<NaiveDateTime>> {
        let parse_error = |row: usize, value: Option<String>| BikeshareError::Parse {
            column: column.to_string(),
            row,
            value: value.unwrap_or_else(|| crate::dataset::NOT_AVAILABLE.to_string()),
        };

        match table.column(column)? {
            ColumnData::Timestamp(values) => values
                .iter()
                .enumerate()
                .map(|(row, ts)| ts.ok_or_else(|| parse_error(row, None)))
                .collect(),
            ColumnData::Text(values) => values
                .iter()
                .enumerate()
                .map(|(row, raw)| {
                    raw.as_deref()
                        .and_then(parse_timestamp)
                        .ok_or_else(|| parse_error(row, raw.clone()))
                })
                .collect(),
            other => (0..other.len())
                .map(|row| {
                    let value = Some(other.cell(row).to_string());
                    Err::<NaiveDateTime, _>(parse_error(row, value))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SAMPLE_CSV, sample_enriched};

    #[test]
    fn test_derived_columns() {
        let enriched = sample_enriched();
        let table = enriched.table();
        assert_eq!(
            table.integers(columns::MONTH).unwrap(),
            &[Some(1), Some(1), Some(3), Some(6)]
        );
        assert_eq!(
            table.integers(columns::WEEKDAY).unwrap(),
            &[Some(0), Some(4), Some(6), Some(1)]
        );
        assert_eq!(
            table.integers(columns::HOUR).unwrap(),
            &[Some(9), Some(17), Some(8), Some(17)]
        );
        assert!(table.timestamps(columns::END_TIME).is_ok());
    }

    #[test]
    fn test_missing_end_time_is_schema_error() {
        let csv = "Start Time,Trip Duration\n2017-01-01 00:00:00,10\n";
        let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
        let err = DatasetEnricher::new().enrich(table).unwrap_err();
        assert!(matches!(err, BikeshareError::Schema { column } if column == "End Time"));
    }

    #[test]
    fn test_unparseable_timestamp_rejects_table() {
        let csv = "Start Time,End Time\n2017-01-01 00:00:00,2017-01-01 00:10:00\nsoon,later\n";
        let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
        match DatasetEnricher::new().enrich(table).unwrap_err() {
            BikeshareError::Parse { column, row, value } => {
                assert_eq!(column, "Start Time");
                assert_eq!(row, 1);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_timestamp_is_parse_error() {
        let csv = "Start Time,End Time\n2017-01-01 00:00:00,\n";
        let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            DatasetEnricher::new().enrich(table),
            Err(BikeshareError::Parse { row: 0, .. })
        ));
    }

    #[test]
    fn test_enrich_is_idempotent_on_columns() {
        let once = sample_enriched();
        let twice = DatasetEnricher::new().enrich(once.clone().into_inner()).unwrap();
        assert_eq!(once, twice);
        let raw = TabularDataset::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(
            twice.column_names().count(),
            raw.column_names().count() + 3
        );
    }

    #[test]
    fn test_empty_table_enriches() {
        let csv = "Start Time,End Time\n";
        let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
        let enriched = DatasetEnricher::new().enrich(table).unwrap();
        assert!(enriched.is_empty());
        assert!(enriched.has_column(columns::HOUR));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2017-06-23 15:09:32.123").is_some());
        assert!(parse_timestamp("2017-06-23T15:09:32").is_some());
        assert!(parse_timestamp("2017-06-23 15:09").is_some());
        assert!(parse_timestamp("").is_none());
    }
}
