//! Core aggregation types and logic.

pub mod record;
pub mod cleaner;
pub mod bucket;
pub mod partial;
pub mod merge;
pub mod finalize;
pub mod row_parallel;
pub mod engine;
pub mod settings;
pub mod config_validation;
pub mod error;
