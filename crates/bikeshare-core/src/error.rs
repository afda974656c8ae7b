//! Error types for bikeshare
//!
//! This module defines the error types used throughout the bikeshare crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use bikeshare_core::error::{BikeshareError, Result};
//!
//! fn require(column: &str, present: bool) -> Result<()> {
//!     if !present {
//!         return Err(BikeshareError::Schema { column: column.to_string() });
//!     }
//!     Ok(())
//! }
//!
//! assert!(require("End Time", false).is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bikeshare operations
///
/// `NotFound`, `Schema` and `Parse` abort the current run before any
/// statistic is computed. An empty filtered table is not an error.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// City data file does not exist
    #[error("File '{}' not found; please check your local data directory", path.display())]
    NotFound {
        /// The path that was looked up
        path: PathBuf,
    },

    /// A required column is absent
    #[error("Invalid file structure: required column '{column}' is missing")]
    Schema {
        /// Name of the missing column
        column: String,
    },

    /// A value could not be parsed
    #[error("Cannot parse '{value}' in column '{column}' (row {row})")]
    Parse {
        /// Column holding the value
        column: String,
        /// Zero-based data row index
        row: usize,
        /// The raw value, or "not available" when the cell was empty
        value: String,
    },

    /// User input outside the allowed set
    #[error("Invalid value '{input}'. Valid values are {expected}")]
    InvalidInput {
        /// What the user typed
        input: String,
        /// Human-readable list of accepted values
        expected: String,
    },

    /// Invalid data inside an otherwise well-formed column
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl BikeshareError {
    /// Shorthand for a missing column
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }
}

/// Convenience type alias for Results in bikeshare
///
/// # Example
///
/// ```
/// use bikeshare_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, BikeshareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BikeshareError::missing_column("End Time");
        assert_eq!(
            error.to_string(),
            "Invalid file structure: required column 'End Time' is missing"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = BikeshareError::NotFound {
            path: PathBuf::from("data/chicago.csv"),
        };
        assert!(error.to_string().contains("data/chicago.csv"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: BikeshareError = io_error.into();
        assert!(matches!(error, BikeshareError::Io(_)));
    }
}
