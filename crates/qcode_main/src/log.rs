use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Variable holding the log filter, e.g. `QCODE_LOG=qcode_provider=debug`.
pub const LOG_FILTER_VAR: &str = "QCODE_LOG";

/// Sends logs to an hourly rolling file under `dir`. Nothing is written to
/// the terminal. The returned guard flushes pending records when dropped.
pub fn init_tracing(dir: PathBuf, verbose: bool) -> anyhow::Result<WorkerGuard> {
    let append = tracing_appender::rolling::hourly(dir, "qcode.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(append);

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(false)
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| anyhow::anyhow!("Failed to initialize logging: {error}"))?;

    Ok(guard)
}
