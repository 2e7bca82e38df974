use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;
use volley_client::FailureKind;
use volley_metrics::Report;

/// Text rendering of a run's [`Report`]; the only output a normal run
/// prints. Verbose mode adds the failure breakdown and the latency
/// distribution.
pub struct RunSummary<'a> {
    report: &'a Report<FailureKind>,
    verbose: bool,
}

impl<'a> RunSummary<'a> {
    pub fn new(report: &'a Report<FailureKind>, verbose: bool) -> RunSummary<'a> {
        RunSummary { report, verbose }
    }
}

fn fmt_duration(d: &Duration) -> String {
    if d.as_secs() >= 5 {
        let s: f64 = d.as_secs() as f64 + (d.subsec_millis() as f64 / 1000.0);
        format!("{:.3}s", s)
    } else if d.as_millis() > 0 {
        format!("{}ms", (d.as_secs() * 1000) + u64::from(d.subsec_millis()))
    } else {
        format!("{}us", d.subsec_micros())
    }
}

impl<'a> Display for RunSummary<'a> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let r = self.report;
        if r.incomplete() {
            writeln!(f, "NOTE: run was cut short; results below are partial")?;
        }
        writeln!(f, "workers:    {}", r.workers())?;
        writeln!(
            f,
            "requests:   {} attempted, {} succeeded, {} failed",
            r.attempted(),
            r.succeeded(),
            r.failed()
        )?;
        writeln!(f, "elapsed:    {}", fmt_duration(&r.elapsed()))?;
        write!(f, "throughput: {:.2} req/s", r.throughput())?;
        if self.verbose {
            if !r.failures_by_kind().is_empty() {
                write!(f, "\nfailures:")?;
                let mut kinds: Vec<(String, u64)> = r
                    .failures_by_kind()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect();
                kinds.sort();
                for (kind, count) in kinds {
                    write!(f, "\n    {}: {}", kind, count)?;
                }
            }
            if r.attempted() > 0 {
                let lat = r.latency();
                write!(
                    f,
                    "\nlatency:    min {}/avg {}/max {}/stdev {}",
                    fmt_duration(&lat.min()),
                    fmt_duration(&lat.mean()),
                    fmt_duration(&lat.max()),
                    fmt_duration(&lat.stdev())
                )?;
                write!(f, "\npercentiles:")?;
                for (p, v) in lat.percentiles() {
                    write!(f, " {} {}", p.label(), fmt_duration(v))?;
                }
            }
        }
        Ok(())
    }
}
