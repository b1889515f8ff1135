//! Per-decade accumulators and the observed year range.

use super::cleaner::{decade_start, DECADE_COUNT};

/// Running sums for one decade. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecadeBucket {
    pub price_sum: f64,
    pub price_count: u64,
    pub return_sum: f64,
    pub return_sum_sq: f64,
    pub return_count: u64,
}

impl DecadeBucket {
    pub fn add_price(&mut self, average_price: f64) {
        self.price_sum += average_price;
        self.price_count += 1;
    }

    pub fn add_return(&mut self, r: f64) {
        self.return_sum += r;
        self.return_sum_sq += r * r;
        self.return_count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.price_count == 0 && self.return_count == 0
    }
}

/// Fixed table of [`DECADE_COUNT`] buckets covering 1900–2100.
#[derive(Debug, Clone, PartialEq)]
pub struct DecadeTable {
    buckets: [DecadeBucket; DECADE_COUNT],
}

impl Default for DecadeTable {
    fn default() -> Self {
        Self {
            buckets: [DecadeBucket::default(); DECADE_COUNT],
        }
    }
}

impl DecadeTable {
    #[cfg(test)]
    pub(crate) fn bucket(&self, index: usize) -> &DecadeBucket {
        &self.buckets[index]
    }

    pub fn bucket_mut(&mut self, index: usize) -> &mut DecadeBucket {
        &mut self.buckets[index]
    }

    /// Bucket for the decade starting at `start_year`, if it is in the domain.
    #[cfg(test)]
    pub(crate) fn by_decade(&self, start_year: i32) -> Option<&DecadeBucket> {
        self.iter()
            .find(|(start, _)| *start == start_year)
            .map(|(_, bucket)| bucket)
    }

    /// `(decade_start_year, bucket)` pairs in ascending decade order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &DecadeBucket)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| (decade_start(i), bucket))
    }

    pub(crate) fn buckets_mut(&mut self) -> &mut [DecadeBucket; DECADE_COUNT] {
        &mut self.buckets
    }
}

/// Smallest and largest year seen, or nothing yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    bounds: Option<(i32, i32)>,
}

impl YearRange {
    pub fn observe(&mut self, year: i32) {
        self.bounds = Some(match self.bounds {
            Some((lo, hi)) => (lo.min(year), hi.max(year)),
            None => (year, year),
        });
    }

    pub fn bounds(&self) -> Option<(i32, i32)> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_accumulates() {
        let mut b = DecadeBucket::default();
        assert!(b.is_empty());
        b.add_price(10.0);
        b.add_price(12.0);
        b.add_return(0.1);
        b.add_return(-0.2);
        assert_eq!(b.price_count, 2);
        assert!((b.price_sum - 22.0).abs() < f64::EPSILON);
        assert_eq!(b.return_count, 2);
        assert!((b.return_sum + 0.1).abs() < 1e-12);
        assert!((b.return_sum_sq - 0.05).abs() < 1e-12);
        assert!(!b.is_empty());
    }

    #[test]
    fn table_iterates_decades_in_order() {
        let table = DecadeTable::default();
        let starts: Vec<i32> = table.iter().map(|(start, _)| start).collect();
        assert_eq!(starts.len(), 21);
        assert_eq!(starts[0], 1900);
        assert_eq!(starts[20], 2100);
        assert!(table.iter().all(|(_, b)| b.is_empty()));
    }

    #[test]
    fn table_lookup_by_decade() {
        let mut table = DecadeTable::default();
        table.bucket_mut(9).add_price(5.0);
        assert_eq!(table.by_decade(1990).unwrap().price_count, 1);
        assert_eq!(table.by_decade(2000).unwrap().price_count, 0);
        assert!(table.by_decade(1995).is_none());
        assert!(table.by_decade(1890).is_none());
    }

    #[test]
    fn year_range_tracks_extremes() {
        let mut range = YearRange::default();
        assert_eq!(range.bounds(), None);
        range.observe(1995);
        range.observe(1987);
        range.observe(2003);
        assert_eq!(range.bounds(), Some((1987, 2003)));
    }
}
