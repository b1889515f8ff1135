//! Record loading port trait.

use crate::domain::error::StatsError;
use crate::domain::record::DailyRecord;
use std::path::Path;

/// Loads one file's accepted rows, in file order.
///
/// Malformed rows are dropped by the implementation. An `Err` that
/// [`StatsError::is_skippable`] means the file is skipped and the run goes on.
pub trait RecordSource {
    fn load(&self, path: &Path) -> Result<Vec<DailyRecord>, StatsError>;
}
