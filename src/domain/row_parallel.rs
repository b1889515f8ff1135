//! Row-parallel aggregation over one in-memory dataset.
//!
//! Two phases over crossbeam channels. First the coordinator broadcasts the
//! row count and a shared handle to the full record sequence to every worker.
//! Then each worker aggregates its own contiguous row range and replies with a
//! [`WorkerPartial`]; replies are reduced in rank order with [`merge_all`].

use std::ops::Range;
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::debug;

use super::cleaner::CleaningRules;
use super::error::StatsError;
use super::merge::merge_all;
use super::partial::WorkerPartial;
use super::record::DailyRecord;

struct Broadcast {
    total: usize,
    records: Arc<[DailyRecord]>,
}

struct Reply {
    rank: usize,
    partial: WorkerPartial,
}

/// Rows owned by `rank` when `total` rows are split over `workers`. The first
/// `total % workers` ranks get one extra row.
pub fn row_range(total: usize, workers: usize, rank: usize) -> Range<usize> {
    let workers = workers.max(1);
    let base = total / workers;
    let extra = total % workers;
    let start = rank * base + rank.min(extra);
    let len = base + usize::from(rank < extra);
    start.min(total)..(start + len).min(total)
}

pub fn scatter_reduce(
    records: Arc<[DailyRecord]>,
    workers: usize,
    rules: CleaningRules,
) -> Result<WorkerPartial, StatsError> {
    let workers = workers.max(1);

    thread::scope(|scope| {
        let (reply_tx, reply_rx) = channel::unbounded::<Reply>();
        let mut inboxes = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for rank in 0..workers {
            let (tx, rx) = channel::bounded::<Broadcast>(1);
            let outbox = reply_tx.clone();
            handles.push(scope.spawn(move || worker(rank, workers, rx, outbox, rules)));
            inboxes.push(tx);
        }
        drop(reply_tx);

        for inbox in &inboxes {
            // a dead worker surfaces through its join handle below
            let _ = inbox.send(Broadcast {
                total: records.len(),
                records: Arc::clone(&records),
            });
        }
        drop(inboxes);

        let mut replies: Vec<Reply> = reply_rx.iter().collect();

        for (rank, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                return Err(StatsError::WorkerPanicked { worker: rank });
            }
        }

        replies.sort_by_key(|r| r.rank);
        Ok(merge_all(replies.iter().map(|r| &r.partial)))
    })
}

fn worker(
    rank: usize,
    workers: usize,
    inbox: Receiver<Broadcast>,
    outbox: Sender<Reply>,
    rules: CleaningRules,
) {
    let Ok(Broadcast { total, records }) = inbox.recv() else {
        return;
    };
    let rows = row_range(total, workers, rank);
    debug!(rank, start = rows.start, end = rows.end, "worker assigned rows");

    let mut partial = WorkerPartial::default();
    partial.accumulate_rows(&records, rows, &rules);
    let _ = outbox.send(Reply { rank, partial });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(n: usize) -> Arc<[DailyRecord]> {
        (0..n)
            .map(|i| {
                let price = 20.0 + (i as f64 * 0.7).sin() * 5.0;
                DailyRecord {
                    date: format!("{}-06-01", 1960 + (i / 40)),
                    open: price,
                    high: price + 0.5,
                    low: price - 0.5,
                    close: price,
                    volume: 1000.0,
                }
            })
            .collect()
    }

    #[test]
    fn ranges_cover_all_rows_once() {
        for total in [0, 1, 7, 10, 101] {
            for workers in 1..=9 {
                let mut next = 0;
                for rank in 0..workers {
                    let r = row_range(total, workers, rank);
                    assert_eq!(r.start, next);
                    next = r.end;
                }
                assert_eq!(next, total, "total={total} workers={workers}");
            }
        }
    }

    #[test]
    fn remainder_goes_to_first_ranks() {
        assert_eq!(row_range(10, 4, 0), 0..3);
        assert_eq!(row_range(10, 4, 1), 3..6);
        assert_eq!(row_range(10, 4, 2), 6..8);
        assert_eq!(row_range(10, 4, 3), 8..10);
    }

    #[test]
    fn more_workers_than_rows() {
        assert_eq!(row_range(2, 5, 0), 0..1);
        assert_eq!(row_range(2, 5, 1), 1..2);
        assert_eq!(row_range(2, 5, 4), 2..2);
    }

    #[test]
    fn scatter_matches_single_pass() {
        let data = series(400);
        let rules = CleaningRules::default();

        let mut expected = WorkerPartial::default();
        expected.accumulate_rows(&data, 0..data.len(), &rules);

        for workers in [1, 2, 3, 4, 8, 16] {
            let got = scatter_reduce(Arc::clone(&data), workers, rules).unwrap();
            assert_eq!(got.records_seen, 400);
            assert_eq!(got.years, expected.years);
            for ((_, e), (_, g)) in expected.table.iter().zip(got.table.iter()) {
                assert_eq!(e.price_count, g.price_count);
                assert_eq!(e.return_count, g.return_count);
                assert_relative_eq!(e.price_sum, g.price_sum, max_relative = 1e-9);
                assert_relative_eq!(e.return_sum, g.return_sum, epsilon = 1e-12, max_relative = 1e-9);
                assert_relative_eq!(e.return_sum_sq, g.return_sum_sq, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn empty_dataset_reduces_to_default() {
        let data: Arc<[DailyRecord]> = Vec::new().into();
        let got = scatter_reduce(data, 4, CleaningRules::default()).unwrap();
        assert_eq!(got, WorkerPartial::default());
    }
}
