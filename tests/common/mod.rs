//! Common test utilities and helpers for bikeshare tests
//!
//! Trip files are built row by row with [`TripBuilder`] and written into a
//! temporary data directory that is removed when the [`TestDataDir`] drops.

#![allow(dead_code)]

use bikeshare::data_loader::DataLoader;
use bikeshare::pipeline::Pipeline;
use bikeshare_core::City;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;
use tempfile::TempDir;

/// Header of the Chicago and New York City files
pub const FULL_HEADER: &str =
    ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";

/// Header of the Washington file, which has no Gender or Birth Year
pub const WASHINGTON_HEADER: &str =
    ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type";

/// Common test stations
pub const TEST_STATIONS: &[&str] = &[
    "Canal St & Adams St",
    "Clinton St & Washington Blvd",
    "Lake Shore Dr & Monroe St",
    "Streeter Dr & Grand Ave",
];

/// Builder for one trip row
#[derive(Debug, Clone)]
pub struct TripBuilder {
    start: NaiveDateTime,
    duration_secs: i64,
    start_station: String,
    end_station: String,
    user_type: String,
    gender: Option<String>,
    birth_year: Option<f64>,
}

impl Default for TripBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TripBuilder {
    pub fn new() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2017, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            duration_secs: 600,
            start_station: TEST_STATIONS[0].to_string(),
            end_station: TEST_STATIONS[1].to_string(),
            user_type: "Subscriber".to_string(),
            gender: Some("Male".to_string()),
            birth_year: Some(1985.0),
        }
    }

    pub fn at(mut self, year: i32, month: u32, day: u32, hour: u32) -> Self {
        self.start = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        self
    }

    pub fn duration(mut self, secs: i64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn route(mut self, start: &str, end: &str) -> Self {
        self.start_station = start.to_string();
        self.end_station = end.to_string();
        self
    }

    pub fn user_type(mut self, user_type: &str) -> Self {
        self.user_type = user_type.to_string();
        self
    }

    pub fn gender(mut self, gender: Option<&str>) -> Self {
        self.gender = gender.map(str::to_string);
        self
    }

    pub fn birth_year(mut self, year: Option<f64>) -> Self {
        self.birth_year = year;
        self
    }

    fn times(&self) -> (String, String) {
        let end = self.start + Duration::seconds(self.duration_secs.max(0));
        (
            self.start.format("%Y-%m-%d %H:%M:%S").to_string(),
            end.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
    }

    /// Row in the Chicago/New York City layout
    pub fn full_row(&self, id: usize) -> String {
        let (start, end) = self.times();
        format!(
            "{id},{start},{end},{},{},{},{},{},{}",
            self.duration_secs,
            self.start_station,
            self.end_station,
            self.user_type,
            self.gender.as_deref().unwrap_or(""),
            self.birth_year.map(|y| format!("{y:.1}")).unwrap_or_default()
        )
    }

    /// Row in the Washington layout
    pub fn washington_row(&self, id: usize) -> String {
        let (start, end) = self.times();
        format!(
            "{id},{start},{end},{},{},{},{}",
            self.duration_secs, self.start_station, self.end_station, self.user_type
        )
    }
}

/// CSV text for `trips` in the layout used by `city`
pub fn city_csv(city: City, trips: &[TripBuilder]) -> String {
    let mut csv = String::new();
    match city {
        City::Washington => {
            csv.push_str(WASHINGTON_HEADER);
            csv.push('\n');
            for (i, trip) in trips.iter().enumerate() {
                csv.push_str(&trip.washington_row(i));
                csv.push('\n');
            }
        }
        City::Chicago | City::NewYorkCity => {
            csv.push_str(FULL_HEADER);
            csv.push('\n');
            for (i, trip) in trips.iter().enumerate() {
                csv.push_str(&trip.full_row(i));
                csv.push('\n');
            }
        }
    }
    csv
}

/// A small, varied set of trips across the first half of 2017
pub fn sample_trips() -> Vec<TripBuilder> {
    vec![
        TripBuilder::new().at(2017, 1, 2, 9).duration(100),
        TripBuilder::new()
            .at(2017, 1, 9, 17)
            .duration(200)
            .gender(Some("Female"))
            .birth_year(Some(1992.0)),
        TripBuilder::new()
            .at(2017, 3, 1, 17)
            .duration(90_000)
            .route(TEST_STATIONS[2], TEST_STATIONS[0])
            .user_type("Customer")
            .gender(None)
            .birth_year(None),
        TripBuilder::new()
            .at(2017, 6, 23, 8)
            .duration(1_000)
            .route(TEST_STATIONS[3], TEST_STATIONS[2])
            .birth_year(Some(1992.0)),
    ]
}

/// Temporary data directory holding city files
pub struct TestDataDir {
    dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a city file with the given trips
    pub fn with_city(self, city: City, trips: &[TripBuilder]) -> Self {
        self.with_raw(city, &city_csv(city, trips))
    }

    /// Write a city file with arbitrary contents
    pub fn with_raw(self, city: City, contents: &str) -> Self {
        std::fs::write(self.dir.path().join(city.file_name()), contents).unwrap();
        self
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(DataLoader::new(self.path()))
    }
}
