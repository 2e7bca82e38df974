use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag polled by every worker between requests.
#[derive(Clone, Default)]
pub struct Interrupted {
    flag: Arc<AtomicBool>,
}

impl Interrupted {
    pub fn new() -> Interrupted {
        Interrupted {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

/// Install the Ctrl+C handler. The first interrupt asks workers to wind
/// down so partial tallies still make it into a report; a second one
/// aborts the process outright.
pub fn register() -> Result<Interrupted, ctrlc::Error> {
    let interrupted = Interrupted::new();
    let seen = interrupted.clone();
    ctrlc::set_handler(move || {
        if seen.interrupted() {
            eprintln!("Aborting (second interrupt)");
            std::process::exit(1);
        }
        eprintln!("Interrupted; letting in-flight requests finish (Ctrl+C again to abort)...");
        seen.trigger();
    })?;
    Ok(interrupted)
}
