//! Optional action log for debugging message flows.
//!
//! When enabled via `--action-log` or `STORYLOOM_ACTION_LOG`, every
//! dispatched message and effect outcome is appended with a timestamp
//! relative to log start. Disabled, [`log_event`] is a cheap no-op.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

static ACTION_LOGGER: LazyLock<Mutex<ActionLogger>> =
    LazyLock::new(|| Mutex::new(ActionLogger::new()));

#[derive(Debug)]
struct ActionLogger {
    enabled: bool,
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl ActionLogger {
    fn new() -> Self {
        Self {
            enabled: false,
            start: Instant::now(),
            writer: None,
        }
    }
}

pub fn set_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut logger = ACTION_LOGGER.lock().expect("action logger lock poisoned");
    if let Some(path) = path {
        let file = File::create(path)?;
        logger.enabled = true;
        logger.start = Instant::now();
        logger.writer = Some(BufWriter::new(file));
        if let Some(writer) = logger.writer.as_mut() {
            writeln!(writer, "storyloom action log start")?;
            writer.flush()?;
        }
    } else {
        logger.enabled = false;
        logger.writer = None;
    }
    Ok(())
}

pub fn is_log_enabled() -> bool {
    ACTION_LOGGER
        .lock()
        .expect("action logger lock poisoned")
        .enabled
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut logger = ACTION_LOGGER.lock().expect("action logger lock poisoned");
    if !logger.enabled {
        return;
    }
    let elapsed_ms = logger.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = logger.writer.as_mut() {
        let _ = writeln!(
            writer,
            "[{elapsed_ms:>10.3} ms] {name}: {}",
            detail.as_ref()
        );
        let _ = writer.flush();
    }
}
