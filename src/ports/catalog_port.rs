//! Input file enumeration port trait.

use crate::domain::error::StatsError;
use std::path::PathBuf;

pub trait CatalogPort {
    /// Every eligible input file. An `Err` aborts the run.
    fn list_files(&self) -> Result<Vec<PathBuf>, StatsError>;

    /// Where the files come from, for diagnostics.
    fn location(&self) -> String;
}
