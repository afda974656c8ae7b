//! Shared test utilities for unit tests
//!
//! Note: integration tests (in tests/) cannot access this module because it's
//! marked with #[cfg(test)]. They have their own fixtures in tests/common.

use crate::dataset::TabularDataset;
use crate::enrich::{DatasetEnricher, EnrichedDataset};

/// Four trips in the layout of the published city files
///
/// | row | start               | weekday | hour | route               | user       |
/// |-----|---------------------|---------|------|---------------------|------------|
/// | 0   | 2017-01-02 09:07:57 | Mon (0) | 9    | Canal St > Clark St | Subscriber |
/// | 1   | 2017-01-06 17:53:21 | Fri (4) | 17   | Canal St > Clark St | Subscriber |
/// | 2   | 2017-03-12 08:00:00 | Sun (6) | 8    | State St > Canal St | Customer   |
/// | 3   | 2017-06-20 17:15:00 | Tue (1) | 17   | Clark St > State St | Subscriber |
pub const SAMPLE_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
10,2017-01-02 09:07:57,2017-01-02 09:20:53,776,Canal St,Clark St,Subscriber,Male,1992.0
11,2017-01-06 17:53:21,2017-01-06 18:10:00,999,Canal St,Clark St,Subscriber,Female,1980.0
12,2017-03-12 08:00:00,2017-03-12 08:30:00,1800,State St,Canal St,Customer,,
13,2017-06-20 17:15:00,2017-06-20 17:45:05,1805,Clark St,State St,Subscriber,Male,1992.0
";

/// The sample trips, enriched
pub fn sample_enriched() -> EnrichedDataset {
    let table = TabularDataset::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
    DatasetEnricher::new().enrich(table).unwrap()
}
