//! Result types produced by the statistics engine
//!
//! Pure data structures. Every statistic yields one [`StatResult`] whose
//! [`StatOutcome`] is either a value, an explicit "no data" for empty input,
//! "not available" for an optional column the city does not publish, or a
//! failure message. The engine never aborts the battery on a single failure.

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// The statistics, in the order they are computed and reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    MostCommonMonth,
    MostCommonWeekday,
    MostCommonHour,
    MostCommonStartStation,
    MostCommonEndStation,
    MostCommonTrip,
    TotalTravelTime,
    AverageTravelTime,
    UserTypeCounts,
    GenderCounts,
    BirthYearStats,
}

impl StatKind {
    pub const ALL: [StatKind; 11] = [
        StatKind::MostCommonMonth,
        StatKind::MostCommonWeekday,
        StatKind::MostCommonHour,
        StatKind::MostCommonStartStation,
        StatKind::MostCommonEndStation,
        StatKind::MostCommonTrip,
        StatKind::TotalTravelTime,
        StatKind::AverageTravelTime,
        StatKind::UserTypeCounts,
        StatKind::GenderCounts,
        StatKind::BirthYearStats,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::MostCommonMonth => "Most common month",
            StatKind::MostCommonWeekday => "Most common weekday",
            StatKind::MostCommonHour => "Most common start hour",
            StatKind::MostCommonStartStation => "Most common start station",
            StatKind::MostCommonEndStation => "Most common end station",
            StatKind::MostCommonTrip => "Most common trip",
            StatKind::TotalTravelTime => "Total travel time",
            StatKind::AverageTravelTime => "Average travel time",
            StatKind::UserTypeCounts => "User types",
            StatKind::GenderCounts => "Genders",
            StatKind::BirthYearStats => "Birth years",
        }
    }

    /// Report section the statistic belongs to
    pub fn section(&self) -> Section {
        match self {
            StatKind::MostCommonMonth | StatKind::MostCommonWeekday | StatKind::MostCommonHour => {
                Section::TravelTimes
            }
            StatKind::MostCommonStartStation
            | StatKind::MostCommonEndStation
            | StatKind::MostCommonTrip => Section::Stations,
            StatKind::TotalTravelTime | StatKind::AverageTravelTime => Section::TripDuration,
            StatKind::UserTypeCounts | StatKind::GenderCounts | StatKind::BirthYearStats => {
                Section::Users
            }
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Report sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    TravelTimes,
    Stations,
    TripDuration,
    Users,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::TravelTimes => "Most frequent times of travel",
            Section::Stations => "Most popular stations and trip",
            Section::TripDuration => "Trip duration",
            Section::Users => "User info",
        }
    }
}

/// Whole seconds split into days, hours, minutes and seconds
///
/// Integer decomposition with cascading remainders, no rounding.
///
/// # Examples
/// ```
/// use bikeshare_stats::DurationBreakdown;
///
/// let d = DurationBreakdown::from_seconds(90_300);
/// assert_eq!((d.days, d.hours, d.minutes, d.seconds), (1, 1, 5, 0));
/// assert_eq!(d.to_seconds(), 90_300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DurationBreakdown {
    pub total_seconds: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationBreakdown {
    pub fn from_seconds(total_seconds: u64) -> Self {
        let days = total_seconds / 86_400;
        let remainder = total_seconds % 86_400;
        let hours = remainder / 3_600;
        let remainder = remainder % 3_600;
        Self {
            total_seconds,
            days,
            hours,
            minutes: remainder / 60,
            seconds: remainder % 60,
        }
    }

    /// Recombine the parts
    pub fn to_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} secs aka {} days, {} hours, {} minutes, {} seconds",
            self.total_seconds, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// One row of a value-count listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// A computed statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatValue {
    Month {
        number: u32,
        name: String,
        occurrences: usize,
    },
    Weekday {
        number: u32,
        name: String,
        occurrences: usize,
    },
    Hour {
        hour: u32,
        occurrences: usize,
    },
    Station {
        name: String,
        occurrences: usize,
    },
    Trip {
        start_station: String,
        end_station: String,
        occurrences: usize,
    },
    Duration(DurationBreakdown),
    Counts {
        entries: Vec<LabelCount>,
    },
    BirthYears {
        earliest: i64,
        latest: i64,
        most_common: i64,
    },
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Month { number, name, .. } | StatValue::Weekday { number, name, .. } => {
                write!(f, "{number} = {name}")
            }
            StatValue::Hour { hour, .. } => write!(f, "{hour}"),
            StatValue::Station { name, .. } => write!(f, "{name}"),
            StatValue::Trip {
                start_station,
                end_station,
                ..
            } => write!(f, "'{start_station}' to '{end_station}'"),
            StatValue::Duration(d) => write!(f, "{d}"),
            StatValue::Counts { entries } => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|e| format!("{}: {}", e.label, e.count))
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
            StatValue::BirthYears {
                earliest,
                latest,
                most_common,
            } => write!(
                f,
                "earliest {earliest}, latest {latest}, most common {most_common}"
            ),
        }
    }
}

/// Outcome of one statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum StatOutcome {
    Value(StatValue),
    /// The (filtered) table had nothing to aggregate
    NoData,
    /// An optional column is not published for this dataset
    NotAvailable { reason: String },
    /// The statistic could not be computed; the rest of the battery still ran
    Failed { message: String },
}

impl fmt::Display for StatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatOutcome::Value(v) => write!(f, "{v}"),
            StatOutcome::NoData => write!(f, "no data"),
            StatOutcome::NotAvailable { reason } => write!(f, "not available ({reason})"),
            StatOutcome::Failed { message } => write!(f, "failed: {message}"),
        }
    }
}

/// A labelled statistic with the time it took to compute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatResult {
    pub kind: StatKind,
    pub label: &'static str,
    pub outcome: StatOutcome,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl StatResult {
    pub fn new(kind: StatKind, outcome: StatOutcome, elapsed: Duration) -> Self {
        Self {
            kind,
            label: kind.label(),
            outcome,
            elapsed,
        }
    }

    /// The computed value, if there is one
    pub fn value(&self) -> Option<&StatValue> {
        match &self.outcome {
            StatOutcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, StatOutcome::Failed { .. })
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_micros() as f64 / 1_000.0)
}
