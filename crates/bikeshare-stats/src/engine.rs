//! The fixed battery of descriptive trip statistics
//!
//! [`StatisticsEngine::run_all`] computes every [`StatKind`] in order over a
//! filtered table. Each statistic is timed and wrapped on its own: an error in
//! one becomes a [`StatOutcome::Failed`] entry and the rest still run.
//!
//! # Tie-breaking
//!
//! Modes are taken over grouped counts that iterate in ascending key order;
//! the first key reaching the maximum count wins. Equal-frequency months,
//! hours or birth years therefore resolve to the lowest number, and stations
//! or trips to the lexicographically smallest name. Missing cells never take
//! part in a mode.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::{DatasetEnricher, TabularDataset};
//! use bikeshare_stats::{StatKind, StatValue, StatisticsEngine};
//!
//! let csv = "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
//!            2017-01-02 09:00:00,2017-01-02 09:10:00,600,A,B,Subscriber\n";
//! let table = TabularDataset::from_csv_reader(csv.as_bytes()).unwrap();
//! let trips = DatasetEnricher::new().enrich(table).unwrap();
//!
//! let results = StatisticsEngine::new().run_all(&trips);
//! assert_eq!(results.len(), StatKind::ALL.len());
//! assert!(matches!(results[2].value(), Some(StatValue::Hour { hour: 9, .. })));
//! ```

use crate::stat_types::{
    DurationBreakdown, LabelCount, StatKind, StatOutcome, StatResult, StatValue,
};
use bikeshare_core::dataset::{GroupKey, TabularDataset};
use bikeshare_core::enrich::EnrichedDataset;
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::types::{columns, month_name, weekday_name};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs the statistics battery
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute every statistic, in [`StatKind::ALL`] order
    pub fn run_all(&self, dataset: &EnrichedDataset) -> Vec<StatResult> {
        debug!("Start of the calculation section ({} rows)", dataset.row_count());
        let results = StatKind::ALL
            .iter()
            .map(|&kind| self.run(kind, dataset.table()))
            .collect();
        debug!("End of the calculation section");
        results
    }

    /// Compute one statistic, timed, with errors folded into the outcome
    ///
    /// Accepts any table so a single statistic can be checked in isolation;
    /// a column the statistic needs but the table lacks yields `Failed`.
    pub fn run(&self, kind: StatKind, table: &TabularDataset) -> StatResult {
        let started = Instant::now();
        let outcome = Self::compute(kind, table).unwrap_or_else(|e| {
            warn!("Calculation of '{}' failed: {}", kind, e);
            StatOutcome::Failed {
                message: e.to_string(),
            }
        });
        let elapsed = started.elapsed();
        debug!("Calculation for '{}' took {:.5} seconds", kind, elapsed.as_secs_f64());
        StatResult::new(kind, outcome, elapsed)
    }

    fn compute(kind: StatKind, table: &TabularDataset) -> Result<StatOutcome> {
        match kind {
            StatKind::MostCommonMonth => most_common_month(table),
            StatKind::MostCommonWeekday => most_common_weekday(table),
            StatKind::MostCommonHour => most_common_hour(table),
            StatKind::MostCommonStartStation => most_common_station(table, columns::START_STATION),
            StatKind::MostCommonEndStation => most_common_station(table, columns::END_STATION),
            StatKind::MostCommonTrip => most_common_trip(table),
            StatKind::TotalTravelTime => total_travel_time(table),
            StatKind::AverageTravelTime => average_travel_time(table),
            StatKind::UserTypeCounts => counts(table, columns::USER_TYPE),
            StatKind::GenderCounts => optional(table, columns::GENDER, counts),
            StatKind::BirthYearStats => optional(table, columns::BIRTH_YEAR, birth_years),
        }
    }
}

/// First group with the highest count, skipping any group with a missing key
fn mode(counts: &BTreeMap<Vec<GroupKey>, usize>) -> Option<(&[GroupKey], usize)> {
    let mut best: Option<(&[GroupKey], usize)> = None;
    for (key, &count) in counts {
        if key.iter().any(GroupKey::is_missing) {
            continue;
        }
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((key.as_slice(), count));
        }
    }
    best
}

/// Mode of a single column
pub fn column_mode(table: &TabularDataset, column: &str) -> Result<Option<(GroupKey, usize)>> {
    let counts = table.group_counts(&[column])?;
    Ok(mode(&counts).and_then(|(key, count)| key.first().cloned().map(|k| (k, count))))
}

fn integer_mode(table: &TabularDataset, column: &str) -> Result<Option<(u32, usize)>> {
    match column_mode(table, column)? {
        None => Ok(None),
        Some((key, count)) => key
            .as_i64()
            .and_then(|n| u32::try_from(n).ok())
            .map(|n| Some((n, count)))
            .ok_or_else(|| {
                BikeshareError::InvalidData(format!("'{key}' is not a valid {column} value"))
            }),
    }
}

fn most_common_month(table: &TabularDataset) -> Result<StatOutcome> {
    let Some((number, occurrences)) = integer_mode(table, columns::MONTH)? else {
        return Ok(StatOutcome::NoData);
    };
    let name = month_name(number)
        .ok_or_else(|| BikeshareError::InvalidData(format!("month {number} out of range")))?;
    Ok(StatOutcome::Value(StatValue::Month {
        number,
        name: name.to_string(),
        occurrences,
    }))
}

fn most_common_weekday(table: &TabularDataset) -> Result<StatOutcome> {
    let Some((number, occurrences)) = integer_mode(table, columns::WEEKDAY)? else {
        return Ok(StatOutcome::NoData);
    };
    let name = weekday_name(number)
        .ok_or_else(|| BikeshareError::InvalidData(format!("weekday {number} out of range")))?;
    Ok(StatOutcome::Value(StatValue::Weekday {
        number,
        name: name.to_string(),
        occurrences,
    }))
}

fn most_common_hour(table: &TabularDataset) -> Result<StatOutcome> {
    Ok(match integer_mode(table, columns::HOUR)? {
        Some((hour, occurrences)) => StatOutcome::Value(StatValue::Hour { hour, occurrences }),
        None => StatOutcome::NoData,
    })
}

fn most_common_station(table: &TabularDataset, column: &str) -> Result<StatOutcome> {
    Ok(match column_mode(table, column)? {
        Some((key, occurrences)) => StatOutcome::Value(StatValue::Station {
            name: key.to_string(),
            occurrences,
        }),
        None => StatOutcome::NoData,
    })
}

fn most_common_trip(table: &TabularDataset) -> Result<StatOutcome> {
    let counts = table.group_counts(&[columns::START_STATION, columns::END_STATION])?;
    Ok(match mode(&counts) {
        Some(([start, end], occurrences)) => StatOutcome::Value(StatValue::Trip {
            start_station: start.to_string(),
            end_station: end.to_string(),
            occurrences,
        }),
        _ => StatOutcome::NoData,
    })
}

/// Non-missing trip durations, in seconds
fn durations(table: &TabularDataset) -> Result<Vec<f64>> {
    Ok(table
        .numbers(columns::TRIP_DURATION)?
        .into_iter()
        .flatten()
        .collect())
}

fn whole_seconds(value: f64) -> Result<u64> {
    if value < 0.0 || !value.is_finite() {
        return Err(BikeshareError::InvalidData(format!(
            "trip duration of {value} seconds cannot be decomposed"
        )));
    }
    Ok(value.trunc() as u64)
}

/// Sum of all durations; an empty table sums to zero
fn total_travel_time(table: &TabularDataset) -> Result<StatOutcome> {
    let total: f64 = durations(table)?.iter().sum();
    Ok(StatOutcome::Value(StatValue::Duration(
        DurationBreakdown::from_seconds(whole_seconds(total)?),
    )))
}

/// Arithmetic mean, truncated to whole seconds before decomposition
fn average_travel_time(table: &TabularDataset) -> Result<StatOutcome> {
    let values = durations(table)?;
    if values.is_empty() {
        return Ok(StatOutcome::NoData);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Ok(StatOutcome::Value(StatValue::Duration(
        DurationBreakdown::from_seconds(whole_seconds(mean)?),
    )))
}

/// Rows per distinct value, most frequent first, ties by ascending label
///
/// Missing cells are counted under "not available" so the counts add up to
/// the row count.
fn counts(table: &TabularDataset, column: &str) -> Result<StatOutcome> {
    if table.is_empty() {
        // Still surface a missing column as a failure
        table.column(column)?;
        return Ok(StatOutcome::NoData);
    }
    let mut entries: Vec<LabelCount> = table
        .group_counts(&[column])?
        .into_iter()
        .map(|(key, count)| {
            let label = key.first().map(ToString::to_string).unwrap_or_default();
            LabelCount::new(label, count)
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    Ok(StatOutcome::Value(StatValue::Counts { entries }))
}

fn birth_years(table: &TabularDataset, column: &str) -> Result<StatOutcome> {
    let years: Vec<i64> = table
        .numbers(column)?
        .into_iter()
        .flatten()
        .filter(|y| y.is_finite())
        .map(|y| y.trunc() as i64)
        .collect();

    let (Some(&earliest), Some(&latest)) = (years.iter().min(), years.iter().max()) else {
        return Ok(StatOutcome::NoData);
    };

    let mut frequency: BTreeMap<i64, usize> = BTreeMap::new();
    for year in &years {
        *frequency.entry(*year).or_insert(0) += 1;
    }
    let mut most_common = earliest;
    let mut best = 0;
    for (year, count) in frequency {
        if count > best {
            most_common = year;
            best = count;
        }
    }

    Ok(StatOutcome::Value(StatValue::BirthYears {
        earliest,
        latest,
        most_common,
    }))
}

/// Run `stat` only if the dataset publishes `column`
fn optional(
    table: &TabularDataset,
    column: &str,
    stat: fn(&TabularDataset, &str) -> Result<StatOutcome>,
) -> Result<StatOutcome> {
    if !table.has_column(column) {
        return Ok(StatOutcome::NotAvailable {
            reason: format!("This dataset does not provide information on attribute '{column}'"),
        });
    }
    stat(table, column)
}
