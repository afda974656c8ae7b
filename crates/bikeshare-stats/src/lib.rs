//! Descriptive trip statistics for bikeshare
//!
//! This crate provides the statistics battery run over a filtered trip table
//! and the result types it produces.

pub mod engine;
pub mod stat_types;

pub use engine::StatisticsEngine;
pub use stat_types::{
    DurationBreakdown, LabelCount, Section, StatKind, StatOutcome, StatResult, StatValue,
};
