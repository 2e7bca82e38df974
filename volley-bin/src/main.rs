mod config;
mod dispatch;
mod interrupt;
mod reporting;
mod worker;

use crate::config::{FileConfig, LoadConfig};
use crate::dispatch::LoadError;
use crate::interrupt::Interrupted;
use crate::reporting::RunSummary;
use clap::{value_t, App, Arg};
use slog::{o, Drain, Level};
use tokio::runtime::Runtime;
use volley_client::FailureKind;
use volley_metrics::Report;

const SUCCESS: i32 = 0;
const FAILURE: i32 = 1;

fn root_logger(level: Level) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let async_drain = slog_async::Async::new(drain).build().fuse();
    let level_filter = slog::LevelFilter(async_drain, level).fuse();
    slog::Logger::root(level_filter, o!())
}

fn run(
    logger: slog::Logger,
    config: &LoadConfig,
    interrupted: Interrupted,
) -> Result<Report<FailureKind>, LoadError> {
    let rt = Runtime::new().map_err(LoadError::Runtime)?;
    rt.block_on(dispatch::run_load(config, &logger, &interrupted))
}

fn main() {
    let matches = App::new("volley")
        .version("0.1.0")
        .about("Generate HTTP load against a single URL and report the aggregate outcome")
        .arg(
            Arg::with_name("processes")
                .short("p")
                .value_name("PROCESSES")
                .help("Number of workers to run in parallel (1)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("requests")
                .short("r")
                .value_name("REQUESTS")
                .help("Number of requests per worker (1)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .value_name("TIMEOUT")
                .help("Per-request timeout in milliseconds (5000)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML file supplying defaults for the flags above")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Verbose report output; repeat to raise log verbosity"),
        )
        .arg(
            Arg::with_name("URL")
                .help("Target URL to issue requests against")
                .required(true)
                .index(1),
        )
        .get_matches();

    let defaults = match matches.value_of("config") {
        Some(path) => match FileConfig::load(path) {
            Ok(defaults) => defaults,
            Err(e) => {
                eprintln!("Could not load defaults file: {}", e);
                std::process::exit(FAILURE);
            }
        },
        None => FileConfig::default(),
    };
    let workers = if matches.is_present("processes") {
        Some(value_t!(matches, "processes", u32).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };
    let requests = if matches.is_present("requests") {
        Some(value_t!(matches, "requests", u32).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };
    let timeout_ms = if matches.is_present("timeout") {
        Some(value_t!(matches, "timeout", u64).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };
    let verbosity = matches.occurrences_of("v");
    let url = matches.value_of("URL").unwrap();
    let config = LoadConfig::resolve(
        url.into(),
        &defaults,
        workers,
        requests,
        timeout_ms,
        verbosity > 0,
    );

    let level = match verbosity {
        0 => Level::Warning,
        1 => Level::Info,
        2 => Level::Debug,
        3 => Level::Trace,
        _ => {
            eprintln!("WARNING: more than -vvv is ignored");
            Level::Trace
        }
    };
    let logger = root_logger(level);
    let interrupted = match interrupt::register() {
        Ok(interrupted) => interrupted,
        Err(e) => {
            eprintln!("Could not install interrupt handler: {}", e);
            std::process::exit(FAILURE);
        }
    };

    match run(logger, &config, interrupted) {
        Ok(report) => {
            println!("{}", RunSummary::new(&report, config.verbose));
            std::process::exit(SUCCESS);
        }
        Err(LoadError::WorkersLost {
            lost,
            total,
            partial,
        }) => {
            eprintln!("Dispatch failed: {} of {} workers lost", lost, total);
            if partial.workers() > 0 {
                println!("{}", RunSummary::new(&partial, config.verbose));
            }
            std::process::exit(FAILURE);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(FAILURE);
        }
    }
}
