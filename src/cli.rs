//! CLI interface for bikeshare
//!
//! Without `--city` the tool runs interactively: it asks for a city, month
//! and weekday, shows the results and offers to start over. With `--city` it
//! runs once for the given selection and exits.
//!
//! # Example
//!
//! ```bash
//! # Interactive session over the files in ./data
//! bikeshare --data-dir data
//!
//! # Fridays in June for Chicago, as JSON
//! bikeshare --city chicago --month june --day friday --json
//! ```

use bikeshare_core::{City, FilterSpec, MonthChoice, WeekdayChoice};
use bikeshare_terminal::DEFAULT_PAGE_SIZE;
use clap::Parser;
use std::path::PathBuf;

/// Explore bicycle-share trip data
#[derive(Parser, Debug, Clone)]
#[command(name = "bikeshare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Run once for this city instead of prompting ("chicago", "new york city" or "washington")
    #[arg(long)]
    pub city: Option<City>,

    /// Only keep trips starting in this month (e.g. "june"); asked for when omitted
    #[arg(long)]
    pub month: Option<MonthChoice>,

    /// Only keep trips starting on this weekday (e.g. "friday"); asked for when omitted
    #[arg(long)]
    pub day: Option<WeekdayChoice>,

    /// Output statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Show how long each statistic took to compute
    #[arg(long)]
    pub timings: bool,

    /// Rows per preview page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(usize))]
    pub page_size: usize,

    /// Skip the raw data preview
    #[arg(long)]
    pub no_preview: bool,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors, overriding RUST_LOG
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// True when the city should be asked for
    pub fn is_interactive(&self) -> bool {
        self.city.is_none()
    }

    /// Filter from the flags; omitted values mean "all"
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new()
            .with_month(self.month.unwrap_or_default())
            .with_weekday(self.day.unwrap_or_default())
    }

    /// Log filter directive used when `RUST_LOG` does not apply
    pub fn default_log_directive(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "bikeshare=info"
        } else {
            "bikeshare=warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Month, Weekday};

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["bikeshare"]);
        assert!(cli.is_interactive());
        assert!(cli.filter_spec().is_unfiltered());
        assert_eq!(cli.page_size, 5);
        assert!(!cli.json && !cli.timings && !cli.no_preview);
        assert_eq!(cli.default_log_directive(), "bikeshare=warn");
    }

    #[test]
    fn test_batch_selection() {
        let cli = Cli::parse_from([
            "bikeshare",
            "--city",
            "New York City",
            "--month",
            "June",
            "--day",
            "friday",
            "--data-dir",
            "/srv/trips",
        ]);
        assert_eq!(cli.city, Some(City::NewYorkCity));
        assert!(!cli.is_interactive());
        assert_eq!(cli.data_dir, PathBuf::from("/srv/trips"));

        let spec = cli.filter_spec();
        assert_eq!(spec.month, MonthChoice::Only(Month::June));
        assert_eq!(spec.weekday, WeekdayChoice::Only(Weekday::Fri));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Cli::try_parse_from(["bikeshare", "--city", "boston"]).is_err());
        assert!(Cli::try_parse_from(["bikeshare", "--month", "smarch"]).is_err());
        assert!(Cli::try_parse_from(["bikeshare", "--page-size", "-1"]).is_err());
    }

    #[test]
    fn test_log_directives() {
        let cli = Cli::parse_from(["bikeshare", "-v"]);
        assert_eq!(cli.default_log_directive(), "bikeshare=info");
        let cli = Cli::parse_from(["bikeshare", "--quiet"]);
        assert_eq!(cli.default_log_directive(), "warn");
        assert!(Cli::try_parse_from(["bikeshare", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_output_flags() {
        let cli = Cli::parse_from([
            "bikeshare",
            "--json",
            "--timings",
            "--no-preview",
            "--page-size",
            "10",
        ]);
        assert!(cli.json && cli.timings && cli.no_preview);
        assert_eq!(cli.page_size, 10);
    }
}
