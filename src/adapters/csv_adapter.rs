//! CSV file record loader.

use crate::domain::error::StatsError;
use crate::domain::record::{DailyRecord, RowShape};
use crate::ports::record_source::RecordSource;
use std::path::Path;

/// First allocation for a file's records; grows by doubling after that.
const INITIAL_CAPACITY: usize = 1024;

const HEADER_LINE: u64 = 1;

pub struct CsvLoader {
    shape: RowShape,
    max_rows: Option<usize>,
}

impl CsvLoader {
    pub fn new(shape: RowShape) -> Self {
        Self {
            shape,
            max_rows: None,
        }
    }

    /// Stop reading a file once this many rows have been accepted.
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }
}

impl RecordSource for CsvLoader {
    fn load(&self, path: &Path) -> Result<Vec<DailyRecord>, StatsError> {
        let unreadable = |reason: String| StatsError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        // Each physical line is its own row: no quoting, so a stray `"` cannot
        // pull later lines into one field. The header is whatever sits on
        // line 1, even when that line is blank; the row layout comes from
        // `shape`, never from the header text.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path)
            .map_err(|e| unreadable(e.to_string()))?;

        let mut records: Vec<DailyRecord> = Vec::new();

        for result in rdr.records() {
            if self.max_rows.is_some_and(|max| records.len() >= max) {
                break;
            }

            let row = match result {
                Ok(row) => row,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(unreadable(e.to_string()));
                }
                // bad UTF-8 and the like: drop the line
                Err(_) => continue,
            };
            if row.position().is_some_and(|pos| pos.line() == HEADER_LINE) {
                continue;
            }

            let Some(record) = self.shape.parse_row(row.iter()) else {
                continue;
            };

            if records.len() == records.capacity() {
                let additional = records.capacity().max(INITIAL_CAPACITY);
                records
                    .try_reserve_exact(additional)
                    .map_err(|_| StatsError::Allocation {
                        path: path.display().to_string(),
                    })?;
            }
            records.push(record);
        }

        Ok(records)
    }
}
