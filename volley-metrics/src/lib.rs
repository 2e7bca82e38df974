mod collector;
mod counter;
mod latency;
mod report;
mod stopwatch;
mod tally;

pub use self::collector::{TallyCollector, TallyHandle};
pub use self::counter::Counters;
pub use self::report::{aggregate, Report};
pub use self::stopwatch::Stopwatch;
pub use self::tally::Tally;
pub mod data {
    pub use crate::latency::{default_percentiles, LatencyRecorder, LatencySnapshot, Percentile};
}
