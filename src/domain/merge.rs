//! Commutative-associative reduction of worker partials.

use super::bucket::{DecadeBucket, DecadeTable, YearRange};
use super::partial::WorkerPartial;

/// Fold another value of the same kind into `self`.
///
/// Implementations are field-wise additions (or min/max for year ranges), so
/// the order and grouping of merges only affects floating-point rounding.
pub trait Merge {
    fn merge(&mut self, other: &Self);
}

impl Merge for DecadeBucket {
    fn merge(&mut self, other: &Self) {
        self.price_sum += other.price_sum;
        self.price_count += other.price_count;
        self.return_sum += other.return_sum;
        self.return_sum_sq += other.return_sum_sq;
        self.return_count += other.return_count;
    }
}

impl Merge for DecadeTable {
    fn merge(&mut self, other: &Self) {
        for (mine, (_, theirs)) in self.buckets_mut().iter_mut().zip(other.iter()) {
            mine.merge(theirs);
        }
    }
}

impl Merge for YearRange {
    fn merge(&mut self, other: &Self) {
        if let Some((lo, hi)) = other.bounds() {
            self.observe(lo);
            self.observe(hi);
        }
    }
}

impl Merge for WorkerPartial {
    fn merge(&mut self, other: &Self) {
        self.table.merge(&other.table);
        self.years.merge(&other.years);
        self.files_used += other.files_used;
        self.records_seen += other.records_seen;
    }
}

/// Sequential left fold of `partials` into a fresh value.
pub fn merge_all<T, I>(partials: I) -> T
where
    T: Merge + Default,
    I: IntoIterator,
    I::Item: std::borrow::Borrow<T>,
{
    use std::borrow::Borrow;

    partials.into_iter().fold(T::default(), |mut acc, p| {
        acc.merge(p.borrow());
        acc
    })
}
