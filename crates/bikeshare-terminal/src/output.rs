//! Output formatting for statistics and row previews
//!
//! Two formatters implement [`OutputFormatter`]:
//! - [`TableFormatter`] for human-readable terminal output
//! - [`JsonFormatter`] for machine-readable output
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::{City, FilterSpec};
//! use bikeshare_stats::{StatKind, StatOutcome, StatResult};
//! use bikeshare_terminal::output::{OutputFormatter, StatisticsReport, get_formatter};
//! use std::time::Duration;
//!
//! let results = vec![StatResult::new(
//!     StatKind::MostCommonMonth,
//!     StatOutcome::NoData,
//!     Duration::ZERO,
//! )];
//! let report = StatisticsReport::new(City::Chicago, FilterSpec::new(), 0, &results);
//!
//! let json = get_formatter(true, false).format_statistics(&report);
//! assert!(json.contains("\"city\": \"Chicago\""));
//! ```

use crate::preview::Page;
use bikeshare_core::dataset::Cell as DataCell;
use bikeshare_core::{City, FilterSpec};
use bikeshare_stats::{Section, StatOutcome, StatResult, StatValue};
use colored::*;
use prettytable::{Cell, Row, Table, format, row};
use serde_json::{Map, Value, json};

/// Narrowest a preview column is squeezed to
const MIN_COLUMN_WIDTH: usize = 8;

/// Everything the statistics view needs
#[derive(Debug, Clone, Copy)]
pub struct StatisticsReport<'a> {
    pub city: City,
    pub filter: FilterSpec,
    pub rows: usize,
    pub results: &'a [StatResult],
}

impl<'a> StatisticsReport<'a> {
    pub fn new(city: City, filter: FilterSpec, rows: usize, results: &'a [StatResult]) -> Self {
        Self {
            city,
            filter,
            rows,
            results,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the statistics battery with its run context
    fn format_statistics(&self, report: &StatisticsReport<'_>) -> String;

    /// Format one page of raw rows
    fn format_preview(&self, page: &Page<'_>) -> String;
}

/// Table formatter for human-readable output
///
/// Counts use thousands separators. Colour is applied to section titles and
/// to outcomes that are not values, and is switched off by `NO_COLOR`.
pub struct TableFormatter {
    pub show_timings: bool,
    colored_output: bool,
}

impl TableFormatter {
    pub fn new(show_timings: bool) -> Self {
        Self {
            show_timings,
            colored_output: std::env::var("NO_COLOR").is_err(),
        }
    }

    /// Override colour detection
    pub fn with_color(mut self, colored_output: bool) -> Self {
        self.colored_output = colored_output;
        self
    }

    /// Format a number with thousands separators
    pub fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    fn format_count(n: usize) -> String {
        Self::format_number(n as u64)
    }

    fn title(&self, text: &str) -> String {
        if self.colored_output {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn outcome_text(&self, outcome: &StatOutcome) -> String {
        let text = outcome.to_string();
        if !self.colored_output {
            return text;
        }
        match outcome {
            StatOutcome::Value(_) => text,
            StatOutcome::NoData | StatOutcome::NotAvailable { .. } => text.dimmed().to_string(),
            StatOutcome::Failed { .. } => text.red().to_string(),
        }
    }

    /// Result and count cells for one statistic, one pair per table row
    fn result_lines(&self, result: &StatResult) -> Vec<(String, String)> {
        let Some(value) = result.value() else {
            return vec![(self.outcome_text(&result.outcome), String::new())];
        };
        match value {
            StatValue::Month { occurrences, .. }
            | StatValue::Weekday { occurrences, .. }
            | StatValue::Hour { occurrences, .. }
            | StatValue::Station { occurrences, .. }
            | StatValue::Trip { occurrences, .. } => {
                vec![(value.to_string(), Self::format_count(*occurrences))]
            }
            StatValue::Duration(_) => vec![(value.to_string(), String::new())],
            StatValue::Counts { entries } => entries
                .iter()
                .map(|e| (e.label.clone(), Self::format_count(e.count)))
                .collect(),
            StatValue::BirthYears {
                earliest,
                latest,
                most_common,
            } => vec![
                (format!("earliest: {earliest}"), String::new()),
                (format!("latest: {latest}"), String::new()),
                (format!("most common: {most_common}"), String::new()),
            ],
        }
    }

    fn section_table(&self, results: &[&StatResult]) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        if self.show_timings {
            table.set_titles(row![b -> "Statistic", b -> "Result", b -> "Count", b -> "Time (ms)"]);
        } else {
            table.set_titles(row![b -> "Statistic", b -> "Result", b -> "Count"]);
        }

        for result in results {
            for (i, (text, count)) in self.result_lines(result).into_iter().enumerate() {
                let label = if i == 0 { result.label } else { "" };
                if self.show_timings {
                    let timing = if i == 0 {
                        format!("{:.3}", result.elapsed.as_secs_f64() * 1_000.0)
                    } else {
                        String::new()
                    };
                    table.add_row(row![label, text, r -> count, r -> timing]);
                } else {
                    table.add_row(row![label, text, r -> count]);
                }
            }
        }
        table
    }
}

impl OutputFormatter for TableFormatter {
    fn format_statistics(&self, report: &StatisticsReport<'_>) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}\nFilter: {} | Rows: {}\n",
            self.title(&format!("Bikeshare statistics for {}", report.city)),
            report.filter,
            Self::format_count(report.rows)
        ));

        let mut sections: Vec<(Section, Vec<&StatResult>)> = Vec::new();
        for result in report.results {
            let section = result.kind.section();
            match sections.last_mut() {
                Some((current, members)) if *current == section => members.push(result),
                _ => sections.push((section, vec![result])),
            }
        }

        for (section, members) in sections {
            output.push_str(&format!("\n{}\n", self.title(section.title())));
            output.push_str(&self.section_table(&members).to_string());
        }

        if self.show_timings {
            let total: f64 = report
                .results
                .iter()
                .map(|r| r.elapsed.as_secs_f64() * 1_000.0)
                .sum();
            output.push_str(&format!("\nCalculations took {total:.3} ms in total\n"));
        }

        output
    }

    fn format_preview(&self, page: &Page<'_>) -> String {
        let names: Vec<&str> = page.column_names().collect();
        let width = terminal_width()
            .map(|w| (w / names.len().max(1)).saturating_sub(3).max(MIN_COLUMN_WIDTH))
            .unwrap_or(usize::MAX);

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(Row::new(
            names
                .iter()
                .map(|name| Cell::new(&console::truncate_str(name, width, "...")).style_spec("b"))
                .collect(),
        ));
        for row in page.rows() {
            table.add_row(Row::new(
                row.cells()
                    .map(|(_, cell)| {
                        Cell::new(&console::truncate_str(&cell.to_string(), width, "..."))
                    })
                    .collect(),
            ));
        }
        format!(
            "Rows {} to {}\n{}",
            page.start() + 1,
            page.start() + page.len(),
            table
        )
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn cell_value(cell: DataCell<'_>) -> Value {
        match cell {
            DataCell::Missing => Value::Null,
            DataCell::Text(s) => json!(s),
            DataCell::Integer(i) => json!(i),
            DataCell::Float(f) => json!(f),
            DataCell::Timestamp(_) => json!(cell.to_string()),
        }
    }

    fn render(value: &Value) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_statistics(&self, report: &StatisticsReport<'_>) -> String {
        let statistics = serde_json::to_value(report.results)
            .unwrap_or_else(|e| json!({ "error": e.to_string() }));
        let output = json!({
            "city": report.city.to_string(),
            "filter": {
                "month": report.filter.month.to_string(),
                "weekday": report.filter.weekday.to_string(),
            },
            "rows": report.rows,
            "statistics": statistics,
        });
        Self::render(&output)
    }

    fn format_preview(&self, page: &Page<'_>) -> String {
        let rows: Vec<Value> = page
            .rows()
            .map(|row| {
                let object: Map<String, Value> = row
                    .cells()
                    .map(|(name, cell)| (name.to_string(), Self::cell_value(cell)))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Self::render(&json!({
            "start": page.start(),
            "rows": rows,
        }))
    }
}

/// Select a formatter
pub fn get_formatter(json: bool, show_timings: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new(show_timings))
    }
}

/// Get terminal width using the cross-platform terminal_size crate
fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(width, _)| width.0 as usize)
}
