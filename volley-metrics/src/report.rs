use crate::counter::Counters;
use crate::latency::{default_percentiles, LatencyRecorder, LatencySnapshot};
use crate::tally::Tally;
use std::hash::Hash;
use std::time::Duration;

/// Merged summary of a completed (or interrupted) run.
#[derive(Debug)]
pub struct Report<K> {
    workers: usize,
    attempted: u64,
    succeeded: u64,
    failed: u64,
    failures_by_kind: Counters<K>,
    total_latency: Duration,
    latency: LatencySnapshot,
    elapsed: Duration,
    throughput: f64,
    incomplete: bool,
}

impl<K> Report<K> {
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn attempted(&self) -> u64 {
        self.attempted
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn failures_by_kind(&self) -> &Counters<K> {
        &self.failures_by_kind
    }

    pub fn total_latency(&self) -> Duration {
        self.total_latency
    }

    pub fn latency(&self) -> &LatencySnapshot {
        &self.latency
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Attempts per second over the run's wall clock.
    pub fn throughput(&self) -> f64 {
        self.throughput
    }

    pub fn incomplete(&self) -> bool {
        self.incomplete
    }

    /// Flag this report as covering an interrupted or lossy run.
    pub fn mark_incomplete(&mut self) {
        self.incomplete = true;
    }
}

/// Merge per-worker tallies and the run's wall-clock time into one report.
///
/// Counts merge commutatively, so tally order never changes the result. A
/// zero or near-zero elapsed time yields a throughput of 0.0 instead of a
/// division blowup.
pub fn aggregate<K>(tallies: &[Tally<K>], elapsed: Duration) -> Report<K>
where
    K: Hash + Eq + Clone,
{
    let mut attempted = 0;
    let mut succeeded = 0;
    let mut failed = 0;
    let mut failures_by_kind = Counters::new();
    let mut total_latency = Duration::from_secs(0);
    let mut latency = LatencyRecorder::new();
    for tally in tallies {
        attempted += tally.attempted();
        succeeded += tally.succeeded();
        failed += tally.failed();
        failures_by_kind.merge(tally.failures());
        total_latency += tally.total_latency();
        latency.merge(tally.latency());
    }
    Report {
        workers: tallies.len(),
        attempted,
        succeeded,
        failed,
        failures_by_kind,
        total_latency,
        latency: latency.snapshot(&default_percentiles()),
        elapsed,
        throughput: throughput(attempted, elapsed),
        incomplete: false,
    }
}

fn throughput(attempted: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= f64::EPSILON {
        0.0
    } else {
        attempted as f64 / secs
    }
}
