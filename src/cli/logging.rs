//! Logging initialization

use std::path::PathBuf;

/// Initialize logging based on debug flag
///
/// Returns the log file path if debug logging is enabled. Logs go to a file
/// because the TUI owns stdout/stderr while it runs.
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    if !debug {
        // No logging by default (silent operation)
        return None;
    }

    let log_path = tempfile::Builder::new()
        .prefix("pod9s-")
        .suffix(".log")
        .tempfile()
        .map(|f| {
            let path = f.path().to_path_buf();
            // Keep the file alive for the lifetime of the process; the OS
            // temp cleanup reclaims it afterwards
            std::mem::forget(f);
            path
        })
        .unwrap_or_else(|_| {
            std::env::temp_dir().join(format!("pod9s-{}.log", std::process::id()))
        });

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(_) => return None,
    };

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_target(true)
        .init();

    Some(log_path)
}
