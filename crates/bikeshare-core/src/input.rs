//! Pure validation of user-supplied choices
//!
//! Every enumerated input (city, month, weekday, yes/no) is checked against a
//! table of `(label, value)` pairs. The same tables back the `FromStr`
//! implementations used by the command-line flags and the interactive prompts,
//! so both surfaces accept exactly the same spellings.

use crate::error::{BikeshareError, Result};
use crate::types::{City, MonthChoice, WeekdayChoice};
use chrono::{Month, Weekday};

/// Accepted city names
pub const CITY_CHOICES: &[(&str, City)] = &[
    ("chicago", City::Chicago),
    ("new york city", City::NewYorkCity),
    ("washington", City::Washington),
];

/// Accepted month names, plus `all`
pub const MONTH_CHOICES: &[(&str, MonthChoice)] = &[
    ("january", MonthChoice::Only(Month::January)),
    ("february", MonthChoice::Only(Month::February)),
    ("march", MonthChoice::Only(Month::March)),
    ("april", MonthChoice::Only(Month::April)),
    ("may", MonthChoice::Only(Month::May)),
    ("june", MonthChoice::Only(Month::June)),
    ("july", MonthChoice::Only(Month::July)),
    ("august", MonthChoice::Only(Month::August)),
    ("september", MonthChoice::Only(Month::September)),
    ("october", MonthChoice::Only(Month::October)),
    ("november", MonthChoice::Only(Month::November)),
    ("december", MonthChoice::Only(Month::December)),
    ("all", MonthChoice::All),
];

/// Accepted weekday names, plus `all`
pub const WEEKDAY_CHOICES: &[(&str, WeekdayChoice)] = &[
    ("monday", WeekdayChoice::Only(Weekday::Mon)),
    ("tuesday", WeekdayChoice::Only(Weekday::Tue)),
    ("wednesday", WeekdayChoice::Only(Weekday::Wed)),
    ("thursday", WeekdayChoice::Only(Weekday::Thu)),
    ("friday", WeekdayChoice::Only(Weekday::Fri)),
    ("saturday", WeekdayChoice::Only(Weekday::Sat)),
    ("sunday", WeekdayChoice::Only(Weekday::Sun)),
    ("all", WeekdayChoice::All),
];

/// Accepted answers to yes/no questions
pub const YES_NO_CHOICES: &[(&str, bool)] = &[
    ("yes", true),
    ("y", true),
    ("no", false),
    ("n", false),
];

/// Validate `raw` against an allowed set
///
/// Input is trimmed and compared case-insensitively. Empty input is not
/// special-cased here; callers that have a default substitute it first.
///
/// # Example
///
/// ```
/// use bikeshare_core::input::{validate_choice, CITY_CHOICES};
/// use bikeshare_core::types::City;
///
/// assert_eq!(validate_choice(" Chicago ", CITY_CHOICES).unwrap(), City::Chicago);
/// assert!(validate_choice("boston", CITY_CHOICES).is_err());
/// ```
pub fn validate_choice<T: Copy>(raw: &str, allowed: &[(&str, T)]) -> Result<T> {
    let normalized = raw.trim().to_lowercase();
    allowed
        .iter()
        .find(|(label, _)| *label == normalized)
        .map(|(_, value)| *value)
        .ok_or_else(|| BikeshareError::InvalidInput {
            input: raw.trim().to_string(),
            expected: describe_choices(allowed),
        })
}

/// Render the labels of an allowed set as `'a', 'b' or 'c'`
pub fn describe_choices<T>(allowed: &[(&str, T)]) -> String {
    let labels: Vec<String> = allowed.iter().map(|(l, _)| format!("'{l}'")).collect();
    match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}
