use crate::counter::Counters;
use crate::latency::LatencyRecorder;
use std::hash::Hash;
use std::time::Duration;

/// Running result count for a single worker.
///
/// A `Tally` is owned and mutated by exactly one worker for its whole life
/// and handed over intact when the worker's loop ends, so no locking is
/// involved anywhere on the request path.
pub struct Tally<K> {
    worker_id: u32,
    succeeded: u64,
    failed: u64,
    failures: Counters<K>,
    total_latency: Duration,
    latency: LatencyRecorder,
}

impl<K> Tally<K>
where
    K: Hash + Eq,
{
    pub fn new(worker_id: u32) -> Tally<K> {
        Tally {
            worker_id,
            succeeded: 0,
            failed: 0,
            failures: Counters::new(),
            total_latency: Duration::from_secs(0),
            latency: LatencyRecorder::new(),
        }
    }

    pub fn record_success(&mut self, latency: Duration) {
        self.succeeded += 1;
        self.total_latency += latency;
        self.latency.record(latency);
    }

    /// Count a failed attempt, attributing it to exactly one kind.
    pub fn record_failure(&mut self, kind: K, latency: Duration) {
        self.failed += 1;
        self.failures.increment(kind);
        self.total_latency += latency;
        self.latency.record(latency);
    }

    pub fn worker_id(&self) -> u32 {
        self.worker_id
    }

    /// Every attempt is either a success or a failure, never both.
    pub fn attempted(&self) -> u64 {
        self.succeeded + self.failed
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn failures(&self) -> &Counters<K> {
        &self.failures
    }

    pub fn total_latency(&self) -> Duration {
        self.total_latency
    }

    pub fn latency(&self) -> &LatencyRecorder {
        &self.latency
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Timeout,
        Connect,
    }

    #[test]
    fn attempted_is_sum_of_successes_and_failures() {
        let mut t = Tally::new(3);
        t.record_success(Duration::from_millis(10));
        t.record_failure(Kind::Timeout, Duration::from_millis(500));
        t.record_failure(Kind::Connect, Duration::from_millis(2));
        t.record_success(Duration::from_millis(12));
        assert_eq!(t.worker_id(), 3);
        assert_eq!(t.attempted(), 4);
        assert_eq!(t.succeeded(), 2);
        assert_eq!(t.failed(), 2);
    }

    #[test]
    fn failures_attributed_to_exactly_one_kind() {
        let mut t = Tally::new(0);
        t.record_failure(Kind::Timeout, Duration::from_millis(500));
        t.record_failure(Kind::Timeout, Duration::from_millis(501));
        t.record_failure(Kind::Connect, Duration::from_millis(1));
        assert_eq!(t.failures().total(), t.failed());
        assert_eq!(t.failures().get(&Kind::Timeout), 2);
        assert_eq!(t.failures().get(&Kind::Connect), 1);
    }

    #[test]
    fn all_success_tally_has_empty_failure_map() {
        let mut t: Tally<Kind> = Tally::new(0);
        t.record_success(Duration::from_millis(1));
        t.record_success(Duration::from_millis(2));
        assert!(t.failures().is_empty());
        assert_eq!(t.total_latency(), Duration::from_millis(3));
        assert_eq!(t.latency().count(), 2);
    }
}
