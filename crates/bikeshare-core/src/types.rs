//! Core domain types for bikeshare
//!
//! Cities, the month/weekday selections that make up a [`FilterSpec`], and the
//! well-known column names of a trip file.

use crate::error::{BikeshareError, Result};
use crate::input::{CITY_CHOICES, MONTH_CHOICES, WEEKDAY_CHOICES, validate_choice};
use chrono::{Month, Weekday};
use std::fmt;
use std::str::FromStr;

/// Column names used by the trip files and the derived calendar columns
pub mod columns {
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    /// Derived: 1 = January .. 12 = December
    pub const MONTH: &str = "month";
    /// Derived: 0 = Monday .. 6 = Sunday
    pub const WEEKDAY: &str = "weekday";
    /// Derived: 0 .. 23
    pub const HOUR: &str = "hour";
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Calendar name for a 1-based month number
///
/// ```
/// use bikeshare_core::types::month_name;
///
/// assert_eq!(month_name(1), Some("January"));
/// assert_eq!(month_name(13), None);
/// ```
pub fn month_name(number: u32) -> Option<&'static str> {
    u8::try_from(number)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .map(|m| m.name())
}

/// Weekday name for a 0-based, Monday-first weekday number
///
/// ```
/// use bikeshare_core::types::weekday_name;
///
/// assert_eq!(weekday_name(0), Some("Monday"));
/// assert_eq!(weekday_name(6), Some("Sunday"));
/// assert_eq!(weekday_name(7), None);
/// ```
pub fn weekday_name(number: u32) -> Option<&'static str> {
    WEEKDAY_NAMES.get(number as usize).copied()
}

/// Cities with published trip data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// All supported cities, in prompt order
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase name as typed by the user
    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the city's trip data, e.g. `new_york_city.csv`
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name().replace(' ', "_"))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            City::Chicago => write!(f, "Chicago"),
            City::NewYorkCity => write!(f, "New York City"),
            City::Washington => write!(f, "Washington"),
        }
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        validate_choice(s, CITY_CHOICES)
    }
}

/// Month part of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthChoice {
    #[default]
    All,
    Only(Month),
}

impl MonthChoice {
    /// 1-based month number, `None` for `All`
    pub fn number(&self) -> Option<u32> {
        match self {
            MonthChoice::All => None,
            MonthChoice::Only(month) => Some(month.number_from_month()),
        }
    }
}

impl fmt::Display for MonthChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthChoice::All => write!(f, "all"),
            MonthChoice::Only(month) => write!(f, "{}", month.name()),
        }
    }
}

impl FromStr for MonthChoice {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        validate_choice(s, MONTH_CHOICES)
    }
}

/// Weekday part of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayChoice {
    #[default]
    All,
    Only(Weekday),
}

impl WeekdayChoice {
    /// 0-based, Monday-first weekday number, `None` for `All`
    pub fn number(&self) -> Option<u32> {
        match self {
            WeekdayChoice::All => None,
            WeekdayChoice::Only(day) => Some(day.num_days_from_monday()),
        }
    }
}

impl fmt::Display for WeekdayChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number() {
            None => write!(f, "all"),
            Some(n) => write!(f, "{}", weekday_name(n).unwrap_or("?")),
        }
    }
}

impl FromStr for WeekdayChoice {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        validate_choice(s, WEEKDAY_CHOICES)
    }
}

/// Month and weekday constraints for one run
///
/// # Example
///
/// ```
/// use bikeshare_core::types::{FilterSpec, MonthChoice, WeekdayChoice};
/// use chrono::{Month, Weekday};
///
/// let spec = FilterSpec::new()
///     .with_month(MonthChoice::Only(Month::March))
///     .with_weekday(WeekdayChoice::Only(Weekday::Fri));
/// assert_eq!(spec.month.number(), Some(3));
/// assert_eq!(spec.weekday.number(), Some(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub month: MonthChoice,
    pub weekday: WeekdayChoice,
}

impl FilterSpec {
    /// A filter that keeps every row
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_month(mut self, month: MonthChoice) -> Self {
        self.month = month;
        self
    }

    pub fn with_weekday(mut self, weekday: WeekdayChoice) -> Self {
        self.weekday = weekday;
        self
    }

    /// True when neither constraint is set
    pub fn is_unfiltered(&self) -> bool {
        self.month == MonthChoice::All && self.weekday == WeekdayChoice::All
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month: {}, weekday: {}", self.month, self.weekday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_file_names() {
        assert_eq!(City::Chicago.file_name(), "chicago.csv");
        assert_eq!(City::NewYorkCity.file_name(), "new_york_city.csv");
        assert_eq!(City::Washington.file_name(), "washington.csv");
    }

    #[test]
    fn test_city_from_str() {
        assert_eq!("washington".parse::<City>().unwrap(), City::Washington);
        assert!("boston".parse::<City>().is_err());
    }

    #[test]
    fn test_month_numbers_are_one_based() {
        assert_eq!(MonthChoice::All.number(), None);
        assert_eq!("january".parse::<MonthChoice>().unwrap().number(), Some(1));
        assert_eq!("december".parse::<MonthChoice>().unwrap().number(), Some(12));
    }

    #[test]
    fn test_weekday_numbers_are_monday_first() {
        assert_eq!("monday".parse::<WeekdayChoice>().unwrap().number(), Some(0));
        assert_eq!("sunday".parse::<WeekdayChoice>().unwrap().number(), Some(6));
        assert_eq!(WeekdayChoice::All.number(), None);
    }

    #[test]
    fn test_filter_spec_display() {
        let spec = FilterSpec::new().with_weekday(WeekdayChoice::Only(Weekday::Wed));
        assert_eq!(spec.to_string(), "month: all, weekday: Wednesday");
        assert!(!spec.is_unfiltered());
        assert!(FilterSpec::new().is_unfiltered());
    }

    #[test]
    fn test_names_round_trip_with_choices() {
        for n in 1..=12 {
            let name = month_name(n).unwrap();
            assert_eq!(name.parse::<MonthChoice>().unwrap().number(), Some(n));
        }
        for n in 0..7 {
            let name = weekday_name(n).unwrap();
            assert_eq!(name.parse::<WeekdayChoice>().unwrap().number(), Some(n));
        }
    }
}
