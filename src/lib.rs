//! bikeshare - Explore bicycle-share trip data from city CSV files
//!
//! This library provides functionality to:
//! - Load a city's trip file from a local data directory
//! - Derive month, weekday and hour columns and filter on them
//! - Compute descriptive statistics over the remaining trips
//! - Run the interactive question-and-answer session
//!
//! # Examples
//!
//! ```no_run
//! use bikeshare::{data_loader::DataLoader, pipeline::Pipeline};
//! use bikeshare_core::{City, FilterSpec};
//! use bikeshare_terminal::get_formatter;
//!
//! fn main() -> bikeshare_core::Result<()> {
//!     let pipeline = Pipeline::new(DataLoader::new("data"));
//!     let report = pipeline.run_once(City::Chicago, FilterSpec::new())?;
//!
//!     let formatter = get_formatter(false, false);
//!     println!("{}", formatter.format_statistics(&report.statistics()));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod data_loader;
pub mod pipeline;
pub mod session;

// Re-export commonly used types
pub use bikeshare_core::{BikeshareError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
