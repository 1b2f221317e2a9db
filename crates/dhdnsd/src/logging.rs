// Logging setup for dhdnsd
//
// `RUST_LOG` wins over `DDNS_LOG_LEVEL` when set. With `DDNS_LOG_DIR` the
// output goes to a daily rotated `dhdns.log.YYYY-MM-DD` file through a
// non-blocking writer; otherwise to stdout.

use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

const LOG_FILE_PREFIX: &str = "dhdns.log";

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must live until
/// the daemon exits.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    match &settings.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow!("Failed to create log directory {}: {}", dir.display(), e))?;

            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(non_blocking)
                .try_init()
                .map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))?;

            Ok(None)
        }
    }
}
