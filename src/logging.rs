use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. The terminal belongs to the UI, so without a log
/// file every event is discarded.
pub fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let Some(path) = log_file else {
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init();
        keep_existing_subscriber(installed);
        return Ok(());
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    keep_existing_subscriber(installed);
    Ok(())
}

/// `try_init` only fails when a global subscriber is already set (a test harness or an
/// embedding binary); that one stays in charge and hears about the second attempt.
fn keep_existing_subscriber(installed: Result<(), Box<dyn Error + Send + Sync + 'static>>) {
    if let Err(err) = installed {
        tracing::debug!("logging already initialized: {err}");
    }
}
