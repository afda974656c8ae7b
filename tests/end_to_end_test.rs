//! End-to-end tests for bikeshare
//!
//! These drive the interactive session from scripted answers and run the
//! compiled binary in batch mode against temporary data directories.

mod common;

use bikeshare::session::{Session, SessionOptions};
use bikeshare_core::City;
use bikeshare_terminal::{Prompter, TableFormatter};
use common::{TestDataDir, TripBuilder, sample_trips};
use std::process::Command;

fn run_session(data: &TestDataDir, answers: &str, options: SessionOptions) -> String {
    let pipeline = data.pipeline();
    let formatter = TableFormatter::new(false).with_color(false);
    let prompter = Prompter::new(answers.as_bytes(), Vec::new());
    let mut session = Session::new(&pipeline, &formatter, prompter, options);
    session.run().unwrap();
    let (_, output) = session.into_prompter().into_parts();
    String::from_utf8(output).unwrap()
}

fn many_trips(count: usize) -> Vec<TripBuilder> {
    (0..count)
        .map(|i| TripBuilder::new().at(2017, 2, 1 + (i % 28) as u32, 8).duration(300))
        .collect()
}

#[test]
fn test_interactive_round_with_preview() {
    let data = TestDataDir::new().with_city(City::Chicago, &many_trips(7));
    // city, month, weekday, two preview pages, then stop
    let output = run_session(&data, "chicago\nfebruary\n\n\n\nno\n", SessionOptions::default());

    assert!(output.contains("Selected city: Chicago | month: February, weekday: all"));
    assert!(output.contains("Loaded 7 records"));
    assert!(output.contains("7 records match the filter"));
    assert!(output.contains("Display up to 5 next rows?"));
    assert!(output.contains("Display up to 2 next rows?"));
    assert!(output.contains("Rows 1 to 5"));
    assert!(output.contains("Rows 6 to 7"));
    assert!(output.contains("no more rows to preview"));
    assert!(output.contains("Bikeshare statistics for Chicago"));
    assert!(output.contains("2 = February"));
}

#[test]
fn test_declining_preview_skips_to_statistics() {
    let data = TestDataDir::new().with_city(City::Chicago, &many_trips(7));
    let output = run_session(&data, "chicago\n\n\nn\nno\n", SessionOptions::default());

    assert!(!output.contains("Rows 1 to"));
    assert!(!output.contains("no more rows to preview"));
    assert!(output.contains("Most popular stations and trip"));
}

#[test]
fn test_rerun_after_missing_city() {
    let data = TestDataDir::new().with_city(City::Washington, &sample_trips());
    let options = SessionOptions {
        preview: false,
        ..SessionOptions::default()
    };
    // First round: Chicago is missing; second round: Washington; then stop
    let output = run_session(
        &data,
        "chicago\n\n\n\nwashington\nmarch\nwednesday\nno\n",
        options,
    );

    assert!(output.contains("chicago.csv' not found"));
    assert!(output.contains("Bikeshare statistics for Washington"));
    assert!(output.contains("1 records match the filter"));
    assert_eq!(output.matches("another calculation").count(), 2);
}

#[test]
fn test_fixed_filter_skips_questions() {
    let data = TestDataDir::new().with_city(City::NewYorkCity, &sample_trips());
    let options = SessionOptions {
        month: Some("january".parse().unwrap()),
        weekday: Some("all".parse().unwrap()),
        preview: false,
        ..SessionOptions::default()
    };
    let output = run_session(&data, "new york city\nno\n", options);

    assert!(!output.contains("Which month?"));
    assert!(output.contains("2 records match the filter"));
}

#[test]
fn test_batch_binary_json() {
    let data = TestDataDir::new().with_city(City::Chicago, &sample_trips());
    let output = Command::new(env!("CARGO_BIN_EXE_bikeshare"))
        .args(["--city", "chicago", "--month", "january", "--json", "--quiet"])
        .arg("--data-dir")
        .arg(data.path())
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["city"], "Chicago");
    assert_eq!(json["filter"]["month"], "January");
    assert_eq!(json["rows"], 2);
}

#[test]
fn test_batch_binary_missing_file_fails() {
    let data = TestDataDir::new();
    let output = Command::new(env!("CARGO_BIN_EXE_bikeshare"))
        .args(["--city", "washington", "--quiet"])
        .arg("--data-dir")
        .arg(data.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("washington.csv"));
}
