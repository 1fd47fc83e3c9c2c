//! Sequential bulk price update.
//!
//! Exactly one PATCH is in flight at any moment. A failed item is logged
//! and counted, and the loop moves on to the next one.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::usecases::u501_bulk_price_update::{
    BatchOutcome, BatchProgress, BatchSummary, PriceBatchJob,
};

use crate::shared::api_client::ApiError;

/// Remote capability the runner needs: change one product's price
#[allow(async_fn_in_trait)]
pub trait PricePatcher {
    async fn patch_price(&self, id: &str, price: f64) -> Result<(), ApiError>;
}

/// Receives progress while the batch runs
pub trait BatchSink {
    /// Called after every processed item
    fn progress(&mut self, progress: &BatchProgress);
    /// Called once when the loop ends, completed or cancelled
    fn finished(&mut self, summary: &BatchSummary);
}

/// Cooperative stop flag, checked between items
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Re-arm the token before the next batch
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run `job` to the end of its snapshot or until `cancel` fires.
///
/// `pause` is awaited between items so the renderer gets a turn; the last
/// item goes straight to the summary. A cancel request never aborts the
/// patch already in flight.
pub async fn run_price_batch<P, S, F, Fut>(
    mut job: PriceBatchJob,
    patcher: &P,
    cancel: &CancelToken,
    sink: &mut S,
    pause: F,
) -> BatchSummary
where
    P: PricePatcher,
    S: BatchSink,
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    log::info!(
        "Bulk price update started: {} products, {}%",
        job.total(),
        job.percent()
    );

    let mut outcome = BatchOutcome::Completed;
    while let Some(update) = job.next_update() {
        if cancel.is_cancelled() {
            outcome = BatchOutcome::Cancelled;
            break;
        }

        let success = match patcher.patch_price(&update.id, update.new_price).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Price update failed for {} ({}): {}",
                    update.name,
                    update.id,
                    e
                );
                false
            }
        };

        let progress = job.record(success);
        sink.progress(&progress);
        if !job.is_done() {
            pause().await;
        }
    }

    let summary = job.finish(outcome);
    log::info!("{}", summary.message);
    sink.finished(&summary);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api_client::ApiClient;
    use crate::shared::storage::KeyValueStore;
    use crate::system::auth::session::tests::logged_in_store;
    use crate::system::auth::session::TOKEN_KEY;
    use contracts::usecases::u501_bulk_price_update::PriceTarget;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::future::ready;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Future that is pending once before completing
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    #[derive(Default)]
    struct FakePatcher {
        calls: RefCell<Vec<(String, f64)>>,
        failing: HashSet<String>,
        unauthorized: HashSet<String>,
        in_flight: Cell<usize>,
        max_in_flight: Cell<usize>,
        cancel_after: Option<(usize, CancelToken)>,
    }

    impl PricePatcher for FakePatcher {
        async fn patch_price(&self, id: &str, price: f64) -> Result<(), ApiError> {
            self.in_flight.set(self.in_flight.get() + 1);
            self.max_in_flight
                .set(self.max_in_flight.get().max(self.in_flight.get()));
            YieldOnce(false).await;
            self.in_flight.set(self.in_flight.get() - 1);

            self.calls.borrow_mut().push((id.to_string(), price));
            if let Some((n, token)) = &self.cancel_after {
                if self.calls.borrow().len() == *n {
                    token.cancel();
                }
            }
            if self.failing.contains(id) {
                Err(ApiError::Network("connection refused".into()))
            } else if self.unauthorized.contains(id) {
                Err(ApiError::Unauthorized)
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        reports: Vec<BatchProgress>,
        finished: Vec<BatchSummary>,
    }

    impl BatchSink for RecordingSink {
        fn progress(&mut self, progress: &BatchProgress) {
            self.reports.push(progress.clone());
        }

        fn finished(&mut self, summary: &BatchSummary) {
            self.finished.push(summary.clone());
        }
    }

    fn job(prices: &[(u32, f64)], percent: f64) -> PriceBatchJob {
        let targets = prices
            .iter()
            .map(|(id, price)| PriceTarget {
                id: id.to_string(),
                name: format!("Product {}", id),
                price: *price,
            })
            .collect();
        PriceBatchJob::from_targets(targets, percent).unwrap()
    }

    fn run(job: PriceBatchJob, patcher: &FakePatcher, cancel: &CancelToken) -> RecordingSink {
        let mut sink = RecordingSink::default();
        block_on(run_price_batch(job, patcher, cancel, &mut sink, || ready(())));
        sink
    }

    #[test]
    fn test_single_product() {
        let patcher = FakePatcher::default();
        let sink = run(job(&[(1, 100.0)], 10.0), &patcher, &CancelToken::new());

        assert_eq!(*patcher.calls.borrow(), vec![("1".to_string(), 110.0)]);
        let summary = &sink.finished[0];
        assert_eq!((summary.succeeded, summary.processed), (1, 1));
        assert_eq!(summary.outcome, BatchOutcome::Completed);
    }

    #[test]
    fn test_failure_does_not_stop_the_batch() {
        let patcher = FakePatcher {
            failing: HashSet::from(["1".to_string()]),
            ..Default::default()
        };
        let sink = run(job(&[(1, 100.0), (2, 50.0)], -10.0), &patcher, &CancelToken::new());

        assert_eq!(
            *patcher.calls.borrow(),
            vec![("1".to_string(), 90.0), ("2".to_string(), 45.0)]
        );
        assert_eq!(sink.finished.len(), 1);
        let summary = &sink.finished[0];
        assert_eq!((summary.succeeded, summary.processed, summary.failed), (1, 2, 1));
        assert_eq!(sink.reports.last().unwrap().message, "1 of 2 products (2 total)");
    }

    #[test]
    fn test_every_item_fails() {
        let patcher = FakePatcher {
            failing: HashSet::from(["1".to_string(), "2".to_string(), "3".to_string()]),
            ..Default::default()
        };
        let sink = run(
            job(&[(1, 1.0), (2, 2.0), (3, 3.0)], 5.0),
            &patcher,
            &CancelToken::new(),
        );
        assert_eq!(patcher.calls.borrow().len(), 3);
        assert_eq!(sink.finished[0].succeeded, 0);
        assert_eq!(sink.finished[0].processed, 3);
    }

    #[test]
    fn test_progress_is_monotonic_and_ordered() {
        let patcher = FakePatcher {
            failing: HashSet::from(["2".to_string()]),
            ..Default::default()
        };
        let items: Vec<(u32, f64)> = (1..=5).map(|i| (i, i as f64 * 10.0)).collect();
        let sink = run(job(&items, 20.0), &patcher, &CancelToken::new());

        let ids: Vec<String> = patcher.calls.borrow().iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        assert_eq!(sink.reports.len(), 5);
        for (i, report) in sink.reports.iter().enumerate() {
            assert_eq!(report.processed, i + 1);
            assert!(report.succeeded <= report.processed);
            assert!(report.processed <= report.total);
        }
        assert!(sink
            .reports
            .windows(2)
            .all(|w| w[0].succeeded <= w[1].succeeded));
        assert_eq!(patcher.max_in_flight.get(), 1);
    }

    #[test]
    fn test_minus_hundred_sets_zero() {
        let patcher = FakePatcher::default();
        run(job(&[(1, 10.0), (2, 99.99)], -100.0), &patcher, &CancelToken::new());
        assert!(patcher.calls.borrow().iter().all(|(_, price)| *price == 0.0));
    }

    #[test]
    fn test_empty_snapshot_still_finishes() {
        let patcher = FakePatcher::default();
        let sink = run(job(&[], 10.0), &patcher, &CancelToken::new());

        assert!(patcher.calls.borrow().is_empty());
        assert!(sink.reports.is_empty());
        assert_eq!(sink.finished.len(), 1);
        assert_eq!((sink.finished[0].succeeded, sink.finished[0].processed), (0, 0));
    }

    #[test]
    fn test_cancel_stops_between_items() {
        let cancel = CancelToken::new();
        let patcher = FakePatcher {
            cancel_after: Some((2, cancel.clone())),
            ..Default::default()
        };
        let sink = run(job(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)], 10.0), &patcher, &cancel);

        assert_eq!(patcher.calls.borrow().len(), 2);
        assert_eq!(sink.finished.len(), 1);
        let summary = &sink.finished[0];
        assert_eq!(summary.outcome, BatchOutcome::Cancelled);
        assert_eq!((summary.processed, summary.total), (2, 4));
    }

    #[test]
    fn test_running_twice_compounds() {
        let patcher = FakePatcher::default();
        run(job(&[(1, 100.0)], 10.0), &patcher, &CancelToken::new());
        let first = patcher.calls.borrow()[0].1;
        run(job(&[(1, first)], 10.0), &patcher, &CancelToken::new());
        assert_eq!(patcher.calls.borrow()[1].1, 121.0);
    }

    #[test]
    fn test_unauthorized_item_is_counted_and_batch_continues() {
        let patcher = FakePatcher {
            unauthorized: HashSet::from(["2".to_string()]),
            ..Default::default()
        };
        let sink = run(job(&[(1, 10.0), (2, 20.0), (3, 30.0)], 10.0), &patcher, &CancelToken::new());

        assert_eq!(patcher.calls.borrow().len(), 3);
        let summary = &sink.finished[0];
        assert_eq!(summary.outcome, BatchOutcome::Completed);
        assert_eq!((summary.processed, summary.total), (3, 3));
        assert_eq!((summary.succeeded, summary.failed), (2, 1));
    }

    /// Patcher that answers like the server would, through the client's
    /// own rejection path
    struct ServerPatcher {
        client: ApiClient,
        expired_from: String,
        calls: Cell<usize>,
    }

    impl PricePatcher for ServerPatcher {
        async fn patch_price(&self, id: &str, _price: f64) -> Result<(), ApiError> {
            self.calls.set(self.calls.get() + 1);
            if id >= self.expired_from.as_str() {
                Err(self.client.reject(401, r#"{"message":"Unauthorized"}"#))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_expired_session_is_cleared_and_batch_finishes() {
        let (session, storage) = logged_in_store();
        let patcher = ServerPatcher {
            client: ApiClient::new("http://api", session.clone()),
            expired_from: "2".into(),
            calls: Cell::new(0),
        };
        let mut sink = RecordingSink::default();
        let summary = block_on(run_price_batch(
            job(&[(1, 10.0), (2, 20.0), (3, 30.0)], 10.0),
            &patcher,
            &CancelToken::new(),
            &mut sink,
            || ready(()),
        ));

        assert_eq!(patcher.calls.get(), 3);
        assert_eq!((summary.processed, summary.succeeded, summary.failed), (3, 1, 2));
        assert_eq!(sink.finished.len(), 1);
        assert_eq!(session.get_token(), None);
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_pause_runs_between_items() {
        let patcher = FakePatcher::default();
        let pauses = Cell::new(0);
        let mut sink = RecordingSink::default();
        block_on(run_price_batch(
            job(&[(1, 1.0), (2, 2.0), (3, 3.0)], 1.0),
            &patcher,
            &CancelToken::new(),
            &mut sink,
            || {
                pauses.set(pauses.get() + 1);
                YieldOnce(false)
            },
        ));
        assert_eq!(pauses.get(), 2);
    }
}
