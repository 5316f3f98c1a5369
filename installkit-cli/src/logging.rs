//! Logging setup.
//!
//! Logs always go to `<log_dir>/installkit.log` through a non-blocking
//! writer. `--verbose` adds a compact stderr layer. `RUST_LOG` overrides the
//! default filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::CliError;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "installkit=info";

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "installkit.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the program exits.
pub fn init_logging(log_dir: &Path, verbose: bool) -> Result<WorkerGuard, CliError> {
    std::fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| CliError::Runtime(format!("failed to initialize logging: {}", e)))?;

    Ok(guard)
}
