//! Logging setup: console (pretty or JSON) plus a `debug.log` file

use anyhow::Result;
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing.
///
/// Console output goes to stderr so stdout carries only the response.
/// The returned guard must stay alive until exit to flush the log file.
/// An unusable log directory only disables the file output.
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: `noteask=info`)
pub fn init_logging(format: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("noteask=info"))?;

    let console = match format {
        // Machine-readable structured logging
        "json" => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        _ => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
    };

    let mut file_error = None;
    let (file_layer, guard) = match log_dir.map(|dir| (dir, open_log_file(dir))) {
        Some((_, Ok((writer, guard)))) => {
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some((dir, Err(e))) => {
            file_error = Some((dir, e));
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    if let Some((dir, e)) = file_error {
        warn!(dir = %dir.display(), error = %e, "Log file unavailable, logging to console only");
    }

    Ok(guard)
}

/// Non-blocking writer for `<dir>/debug.log`
fn open_log_file(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("debug")
        .filename_suffix("log")
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}
