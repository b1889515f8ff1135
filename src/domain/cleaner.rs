//! Year extraction, decade binning and the price/return validity filters.

use super::record::DailyRecord;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;
pub const DECADE_COUNT: usize = ((MAX_YEAR - MIN_YEAR) / 10 + 1) as usize;

/// Integer formed by the leading digits of `date` (after optional whitespace
/// and sign). `None` when the token does not start with a number.
pub fn leading_year(date: &str) -> Option<i32> {
    let s = date.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i32 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Bucket index for `year`, or `None` outside [MIN_YEAR, MAX_YEAR].
pub fn decade_index(year: i32) -> Option<usize> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    let index = ((year - MIN_YEAR) / 10) as usize;
    (index < DECADE_COUNT).then_some(index)
}

/// First year of the decade at `index`.
pub fn decade_start(index: usize) -> i32 {
    MIN_YEAR + 10 * index as i32
}

/// Validity filters applied before any value reaches a bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleaningRules {
    pub min_price: f64,
    pub max_price: f64,
    pub max_abs_return: f64,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            min_price: 0.01,
            max_price: 10_000.0,
            max_abs_return: 1.0,
        }
    }
}

impl CleaningRules {
    /// Inclusive on both ends.
    pub fn price_in_bounds(&self, price: f64) -> bool {
        price >= self.min_price && price <= self.max_price
    }

    pub fn accepts_prices(&self, rec: &DailyRecord) -> bool {
        self.price_in_bounds(rec.open)
            && self.price_in_bounds(rec.high)
            && self.price_in_bounds(rec.low)
            && self.price_in_bounds(rec.close)
    }

    /// Close-to-close return from `prev` to `next`, or `None` when either
    /// close is out of bounds, the earlier close is zero, or the move exceeds
    /// `max_abs_return`.
    pub fn daily_return(&self, prev: &DailyRecord, next: &DailyRecord) -> Option<f64> {
        let p = prev.close;
        let q = next.close;
        if !self.price_in_bounds(p) || !self.price_in_bounds(q) || p == 0.0 {
            return None;
        }
        let r = (q - p) / p;
        (r.abs() <= self.max_abs_return).then_some(r)
    }
}
