use crate::interrupt::Interrupted;
use std::future::Future;
use volley_client::{FailureKind, Outcome};
use volley_metrics::{Tally, TallyHandle};

/// One worker: a strictly sequential batch of requests.
///
/// Concurrency comes only from running several workers at once; a single
/// worker never has two requests in flight and never retries. The tally is
/// submitted exactly once, after the last attempt (or early, if the run
/// was interrupted).
pub async fn run<F, Fut>(
    id: u32,
    requests: u32,
    fetch: F,
    tallies: TallyHandle<FailureKind>,
    interrupted: Interrupted,
    log: slog::Logger,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Outcome>,
{
    let mut tally = Tally::new(id);
    slog::debug!(log, "worker starting"; "requests" => requests);
    for _ in 0..requests {
        if interrupted.interrupted() {
            slog::debug!(log, "worker interrupted"; "attempted" => tally.attempted());
            break;
        }
        let outcome = fetch().await;
        match outcome.failure_kind() {
            None => tally.record_success(outcome.latency()),
            Some(kind) => {
                slog::trace!(log, "request failed"; "kind" => %kind);
                tally.record_failure(kind, outcome.latency());
            }
        }
    }
    slog::debug!(log, "worker finished";
        "attempted" => tally.attempted(),
        "succeeded" => tally.succeeded(),
        "failed" => tally.failed(),
    );
    tallies.submit(tally);
}

#[cfg(test)]
mod test {
    use super::*;
    use slog::o;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use volley_metrics::TallyCollector;

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, o!())
    }

    #[tokio::test]
    async fn completes_every_attempt_and_submits_once() {
        let collector = TallyCollector::new();
        let fetch = || async { Outcome::success(Duration::from_millis(10)) };
        run(
            0,
            5,
            fetch,
            collector.handle(),
            Interrupted::new(),
            test_logger(),
        )
        .await;
        let tallies = collector.drain();
        assert_eq!(tallies.len(), 1);
        assert_eq!(tallies[0].attempted(), 5);
        assert_eq!(tallies[0].succeeded(), 5);
        assert_eq!(tallies[0].failed(), 0);
        assert!(tallies[0].failures().is_empty());
    }

    #[tokio::test]
    async fn requests_run_sequentially() {
        let in_flight = Arc::new(AtomicU64::new(0));
        let overlap = Arc::new(AtomicU64::new(0));
        let collector = TallyCollector::new();
        let fetch = {
            let in_flight = in_flight.clone();
            let overlap = overlap.clone();
            move || {
                let in_flight = in_flight.clone();
                let overlap = overlap.clone();
                async move {
                    if in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
                        overlap.fetch_add(1, Ordering::SeqCst);
                    }
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Outcome::success(Duration::from_millis(1))
                }
            }
        };
        run(
            1,
            10,
            fetch,
            collector.handle(),
            Interrupted::new(),
            test_logger(),
        )
        .await;
        assert_eq!(overlap.load(Ordering::SeqCst), 0);
        assert_eq!(collector.drain()[0].attempted(), 10);
    }

    #[tokio::test]
    async fn mixed_outcomes_are_tallied_by_kind() {
        let collector = TallyCollector::new();
        let calls = Arc::new(AtomicU64::new(0));
        let fetch = {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    match n % 3 {
                        0 => Outcome::success(Duration::from_millis(5)),
                        1 => Outcome::failure(FailureKind::Timeout, Duration::from_millis(500)),
                        _ => Outcome::failure(FailureKind::Http(500), Duration::from_millis(7)),
                    }
                }
            }
        };
        run(
            2,
            6,
            fetch,
            collector.handle(),
            Interrupted::new(),
            test_logger(),
        )
        .await;
        let tallies = collector.drain();
        assert_eq!(tallies[0].attempted(), 6);
        assert_eq!(tallies[0].succeeded(), 2);
        assert_eq!(tallies[0].failed(), 4);
        assert_eq!(tallies[0].failures().get(&FailureKind::Timeout), 2);
        assert_eq!(tallies[0].failures().get(&FailureKind::Http(500)), 2);
    }

    #[tokio::test]
    async fn interrupt_stops_further_requests_but_submits_partial_tally() {
        let collector = TallyCollector::new();
        let interrupted = Interrupted::new();
        let calls = Arc::new(AtomicU64::new(0));
        let fetch = {
            let calls = calls.clone();
            let interrupted = interrupted.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 2 {
                    interrupted.trigger();
                }
                async move { Outcome::success(Duration::from_millis(1)) }
            }
        };
        run(
            3,
            100,
            fetch,
            collector.handle(),
            interrupted,
            test_logger(),
        )
        .await;
        let tallies = collector.drain();
        assert_eq!(tallies.len(), 1);
        assert_eq!(tallies[0].attempted(), 3);
        assert!(tallies[0].attempted() < 100);
    }
}
