use hdrhistogram::Histogram;
use std::fmt::{self, Display};
use std::time::Duration;

// Latencies are recorded with microsecond resolution; anything finer is
// noise at HTTP scale.
fn dur_to_micros(d: Duration) -> u64 {
    d.as_secs()
        .saturating_mul(1_000_000)
        .saturating_add(d.subsec_micros().into())
}

fn micros_to_dur(v: u64) -> Duration {
    Duration::from_micros(v)
}

/// Records observed request latencies into an auto-resizing histogram.
pub struct LatencyRecorder {
    histo: Histogram<u64>,
}

impl Default for LatencyRecorder {
    fn default() -> Self {
        LatencyRecorder::new()
    }
}

impl LatencyRecorder {
    pub fn new() -> LatencyRecorder {
        LatencyRecorder {
            histo: Histogram::new(3).expect("3 significant figures is a valid histogram precision"),
        }
    }

    pub fn record(&mut self, latency: Duration) {
        self.histo.saturating_record(dur_to_micros(latency));
    }

    /// Fold every recorded value from `other` into `self`.
    pub fn merge(&mut self, other: &LatencyRecorder) {
        let _ = self.histo.add(&other.histo);
    }

    pub fn count(&self) -> u64 {
        self.histo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histo.is_empty()
    }

    pub fn snapshot(&self, percentiles: &[Percentile]) -> LatencySnapshot {
        LatencySnapshot {
            min: micros_to_dur(self.histo.min()),
            max: micros_to_dur(self.histo.max()),
            mean: micros_to_dur(self.histo.mean().trunc() as u64),
            stdev: micros_to_dur(self.histo.stdev().trunc() as u64),
            percentiles: percentiles
                .iter()
                .map(|p| (p.clone(), micros_to_dur(self.histo.value_at_percentile(p.percentile))))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Percentile {
    label: String,
    percentile: f64,
}

impl Percentile {
    pub fn new<S: Into<String>>(label: S, percentile: f64) -> Percentile {
        Percentile {
            label: label.into(),
            percentile,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

pub fn default_percentiles() -> Vec<Percentile> {
    vec![
        Percentile::new("p50", 50.0),
        Percentile::new("p75", 75.0),
        Percentile::new("p90", 90.0),
        Percentile::new("p95", 95.0),
        Percentile::new("p99", 99.0),
        Percentile::new("p99.9", 99.9),
    ]
}

/// Immutable view of a latency distribution, taken when a run is aggregated.
#[derive(Debug, Clone)]
pub struct LatencySnapshot {
    min: Duration,
    max: Duration,
    mean: Duration,
    stdev: Duration,
    percentiles: Vec<(Percentile, Duration)>,
}

impl LatencySnapshot {
    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn mean(&self) -> Duration {
        self.mean
    }

    pub fn stdev(&self) -> Duration {
        self.stdev
    }

    pub fn percentiles(&self) -> &[(Percentile, Duration)] {
        &self.percentiles
    }
}
