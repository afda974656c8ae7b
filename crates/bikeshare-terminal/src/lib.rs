//! Terminal output formatting for bikeshare
//!
//! This crate provides table and JSON output formatters, the row preview
//! pager and the interactive prompts.

pub mod output;
pub mod preview;
pub mod prompt;

pub use output::{JsonFormatter, OutputFormatter, StatisticsReport, TableFormatter, get_formatter};
pub use preview::{DEFAULT_PAGE_SIZE, Page, RowPager};
pub use prompt::Prompter;
