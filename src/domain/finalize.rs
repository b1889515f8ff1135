//! Turns merged sums into per-decade statistics.

use std::collections::BTreeMap;

use super::bucket::{DecadeBucket, YearRange};
use super::partial::WorkerPartial;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStats {
    pub count: u64,
    pub mean_daily_return: f64,
    pub variance: f64,
    pub volatility: f64,
    pub annualized_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecadeStats {
    pub decade_start: i32,
    pub rows_used: u64,
    /// `None` when no row in the decade passed the price filter.
    pub mean_price: Option<f64>,
    /// `None` when no return in the decade was accepted.
    pub returns: Option<ReturnStats>,
}

impl DecadeStats {
    /// Standard deviation of accepted returns; 0 when there were none.
    pub fn volatility(&self) -> f64 {
        self.returns.as_ref().map_or(0.0, |r| r.volatility)
    }

    pub fn mean_daily_return(&self) -> Option<f64> {
        self.returns.as_ref().map(|r| r.mean_daily_return)
    }

    pub fn annualized_return(&self) -> Option<f64> {
        self.returns.as_ref().map(|r| r.annualized_return)
    }

    /// `None` for a bucket that saw neither prices nor returns.
    pub fn from_bucket(decade_start: i32, bucket: &DecadeBucket) -> Option<Self> {
        if bucket.is_empty() {
            return None;
        }

        let mean_price =
            (bucket.price_count > 0).then(|| bucket.price_sum / bucket.price_count as f64);

        let returns = (bucket.return_count > 0).then(|| {
            let n = bucket.return_count as f64;
            let mean = bucket.return_sum / n;
            let mean_sq = bucket.return_sum_sq / n;
            let variance = (mean_sq - mean * mean).max(0.0);
            ReturnStats {
                count: bucket.return_count,
                mean_daily_return: mean,
                variance,
                volatility: variance.sqrt(),
                annualized_return: mean * TRADING_DAYS_PER_YEAR,
            }
        });

        Some(Self {
            decade_start,
            rows_used: bucket.price_count,
            mean_price,
            returns,
        })
    }
}

/// Final, read-only result of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSummary {
    pub decades: BTreeMap<i32, DecadeStats>,
    pub years: YearRange,
    pub files_used: usize,
    pub records_seen: u64,
}

impl MarketSummary {
    pub fn finalize(merged: &WorkerPartial) -> Self {
        let decades = merged
            .table
            .iter()
            .filter_map(|(start, bucket)| {
                DecadeStats::from_bucket(start, bucket).map(|stats| (start, stats))
            })
            .collect();

        Self {
            decades,
            years: merged.years,
            files_used: merged.files_used,
            records_seen: merged.records_seen,
        }
    }

    pub fn decade(&self, start_year: i32) -> Option<&DecadeStats> {
        self.decades.get(&start_year)
    }
}
