//! Worker-private accumulation over files or row ranges.
//!
//! A [`WorkerPartial`] is owned by exactly one worker while the run is
//! collecting. Nothing in here is shared; the merge step folds partials
//! together afterwards.

use std::ops::Range;

use super::bucket::{DecadeTable, YearRange};
use super::cleaner::{decade_index, CleaningRules};
use super::record::DailyRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerPartial {
    pub table: DecadeTable,
    pub years: YearRange,
    pub files_used: usize,
    pub records_seen: u64,
}

impl WorkerPartial {
    /// Fold one file's records into this partial. Files with at most one
    /// record contribute nothing and return `false`.
    pub fn accumulate_file(&mut self, records: &[DailyRecord], rules: &CleaningRules) -> bool {
        if records.len() <= 1 {
            return false;
        }
        self.accumulate_rows(records, 0..records.len(), rules);
        self.files_used += 1;
        true
    }

    /// Single pass over `rows` of `records`.
    ///
    /// Prices are taken from every row in the range. The return for row `i`
    /// pairs it with row `i + 1` of the full slice, so a range boundary does
    /// not drop a return as long as each row lands in exactly one range. The
    /// return is binned by the decade of the earlier row.
    pub fn accumulate_rows(
        &mut self,
        records: &[DailyRecord],
        rows: Range<usize>,
        rules: &CleaningRules,
    ) {
        let end = rows.end.min(records.len());
        for i in rows.start..end {
            let rec = &records[i];
            self.records_seen += 1;

            let Some(year) = rec.year() else {
                continue;
            };
            self.years.observe(year);

            let Some(index) = decade_index(year) else {
                continue;
            };
            let bucket = self.table.bucket_mut(index);

            if rules.accepts_prices(rec) {
                bucket.add_price(rec.average_price());
            }

            if let Some(next) = records.get(i + 1) {
                if let Some(r) = rules.daily_return(rec, next) {
                    bucket.add_return(r);
                }
            }
        }
    }
}
