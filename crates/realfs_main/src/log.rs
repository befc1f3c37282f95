use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const DEFAULT_FILTER: &str = "realfs=warn";

/// Keeps the background log writer alive; logs are flushed when dropped.
pub struct Guard(#[allow(dead_code)] Option<WorkerGuard>);

pub fn init_tracing(config: &Config) -> anyhow::Result<Guard> {
    let filter = EnvFilter::try_new(config.log_filter.as_deref().unwrap_or(DEFAULT_FILTER))?;

    let guard = match &config.log_dir {
        Some(dir) => {
            let append = tracing_appender::rolling::hourly(dir, "realfs.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(append);
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_timer(tracing_subscriber::fmt::time::uptime())
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    debug!(log_dir = ?config.log_dir, "Logging initialized");
    Ok(Guard(guard))
}
