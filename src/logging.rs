//! Logging for the facegate services and CLI.
//!
//! At `info` every decision is logged with the ids involved: enrollments,
//! indexed and discarded faces, rejected matches with their similarity,
//! liveness outcomes. `debug` adds each Rekognition call and the resolved
//! region/endpoint; failed calls and failed cleanups are `warn`. Image bytes
//! and credentials are never logged.
//!
//! Events go to systemd's journal (identifier `facegate`) when it is
//! reachable and to `facegate.log`, rotated daily, otherwise. Standard
//! output is left to command results.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Level and targets come from `FACEGATE_LOG` using `EnvFilter` syntax,
/// e.g. `debug` or `facegate=debug,aws_config=warn`; default `info`.
/// `log_dir` only matters for the file backend.
pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env("FACEGATE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(target_os = "linux")]
    {
        if let Ok(journald_layer) = tracing_journald::layer() {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(journald_layer.with_syslog_identifier("facegate".to_string()))
                .try_init()?;

            tracing::debug!("Logging initialized with journald backend");
            return Ok(());
        }
    }

    let log_dir = log_dir.unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "facegate.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the worker alive for the life of the process
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    tracing::debug!(dir = ?log_dir, "Logging initialized with file backend");
    Ok(())
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("facegate")
        .join("logs")
}
