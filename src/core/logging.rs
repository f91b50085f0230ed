use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::config::AppPaths;

const LOG_FILE_PREFIX: &str = "server.log";

// Provider HTTP internals are noisy at info.
const DEFAULT_DIRECTIVES: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn rolling_appender(log_dir: &Path) -> RollingFileAppender {
    tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the global subscriber: stdout plus a daily rolling file under the log dir.
///
/// `RUST_LOG` overrides the default directives. Calling this twice keeps the
/// first subscriber.
pub fn init(paths: &AppPaths) {
    if let Err(err) = std::fs::create_dir_all(&paths.log_dir) {
        eprintln!(
            "Failed to create log directory {}: {}",
            paths.log_dir.display(),
            err
        );
    }

    let (writer, guard) = tracing_appender::non_blocking(rolling_appender(&paths.log_dir));
    if LOG_GUARD.set(guard).is_err() {
        return;
    }

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer);

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", err);
    }
}
