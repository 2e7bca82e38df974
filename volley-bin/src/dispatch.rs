use crate::config::{ConfigError, LoadConfig};
use crate::interrupt::Interrupted;
use crate::worker;
use futures::future;
use http::Uri;
use slog::{o, Logger};
use std::future::Future;
use thiserror::Error;
use volley_client::{Client, FailureKind, Outcome};
use volley_metrics::{aggregate, Report, Stopwatch, TallyCollector};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not start the runtime: {0}")]
    Runtime(std::io::Error),
    #[error("{lost} of {total} workers were lost before finishing")]
    WorkersLost {
        lost: usize,
        total: u32,
        partial: Box<Report<FailureKind>>,
    },
}

/// Check every config invariant before a single worker exists.
///
/// Returns the parsed target URI on success; the dispatcher is the one
/// place that turns the CLI's raw string into something requestable.
pub fn validate(config: &LoadConfig) -> Result<Uri, ConfigError> {
    if config.workers == 0 {
        return Err(ConfigError::NoWorkers);
    }
    if config.requests == 0 {
        return Err(ConfigError::NoRequests);
    }
    if config.timeout.as_nanos() == 0 {
        return Err(ConfigError::ZeroTimeout);
    }
    let url: Uri = config.target.parse().map_err(|e: http::uri::InvalidUri| {
        ConfigError::InvalidUrl {
            url: config.target.clone(),
            reason: e.to_string(),
        }
    })?;
    match url.scheme_str() {
        Some("http") | Some("https") => {}
        _ => {
            return Err(ConfigError::InvalidUrl {
                url: config.target.clone(),
                reason: "expected an absolute http or https url".into(),
            });
        }
    }
    if url.host().is_none() {
        return Err(ConfigError::InvalidUrl {
            url: config.target.clone(),
            reason: "url has no host".into(),
        });
    }
    Ok(url)
}

/// Run the configured load against the real HTTP client.
pub async fn run_load(
    config: &LoadConfig,
    log: &Logger,
    interrupted: &Interrupted,
) -> Result<Report<FailureKind>, LoadError> {
    let url = validate(config)?;
    let client = Client::new(config.timeout);
    run_load_with(config, log, interrupted, move |_id| {
        let client = client.clone();
        let url = url.clone();
        move || {
            let client = client.clone();
            let url = url.clone();
            async move { client.fetch(&url).await }
        }
    })
    .await
}

/// The dispatch engine, generic over how a worker's requests are performed.
///
/// Spawns exactly `config.workers` tasks, waits for every one of them
/// (success or failure) at a single join barrier, then merges whatever
/// tallies arrived. Losing a worker is fatal to the run as a whole but the
/// surviving tallies are still aggregated into the returned partial report.
pub async fn run_load_with<M, F, Fut>(
    config: &LoadConfig,
    log: &Logger,
    interrupted: &Interrupted,
    make_fetch: M,
) -> Result<Report<FailureKind>, LoadError>
where
    M: Fn(u32) -> F,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    validate(config)?;
    slog::info!(log, "starting load run";
        "url" => &config.target,
        "workers" => config.workers,
        "requests" => config.requests,
    );
    let collector = TallyCollector::new();
    let clock = Stopwatch::new();
    let handles: Vec<_> = (0..config.workers)
        .map(|id| {
            tokio::spawn(worker::run(
                id,
                config.requests,
                make_fetch(id),
                collector.handle(),
                interrupted.clone(),
                log.new(o!("worker" => id)),
            ))
        })
        .collect();
    let joined = future::join_all(handles).await;
    let elapsed = clock.elapsed();

    let lost = joined.iter().filter(|r| r.is_err()).count();
    let tallies = collector.drain();
    let mut report = aggregate(&tallies, elapsed);
    if interrupted.interrupted() {
        report.mark_incomplete();
    }
    if lost > 0 {
        slog::error!(log, "run lost workers"; "lost" => lost, "of" => config.workers);
        report.mark_incomplete();
        return Err(LoadError::WorkersLost {
            lost,
            total: config.workers,
            partial: Box::new(report),
        });
    }
    slog::info!(log, "load run finished";
        "attempted" => report.attempted(),
        "failed" => report.failed(),
    );
    Ok(report)
}
