//! Tracing setup.
//!
//! Two sinks:
//! - stderr, filtered by `TDX_LOG` (default `warn`)
//! - a daily rolling file under `<base>/logs/`, at `debug` for tdx crates
//!
//! The file sink is best effort: if the directory cannot be created, only
//! stderr logging is installed.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_ENV: &str = "TDX_LOG";
const DEFAULT_STDERR_FILTER: &str = "warn";
const FILE_FILTER: &str = "tdx=debug,tdx_core=debug,warn";

fn stderr_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDERR_FILTER))
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter());

    let file_appender = std::fs::create_dir_all(logs_dir).ok().and_then(|()| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("tdx")
            .filename_suffix("log")
            .build(logs_dir)
            .ok()
    });

    match file_appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(FILE_FILTER));
            let _ = tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
            None
        }
    }
}
