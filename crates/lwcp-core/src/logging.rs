//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/lwc-preview/logs/`
/// Log level is controlled by `LWCP_LOG` environment variable.
///
/// # Examples
/// ```bash
/// LWCP_LOG=debug lwcp force-app/main/default/lwc/hello
/// LWCP_LOG=lwcp_launcher=trace lwcp ...
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "lwcp.log");

    let env_filter = EnvFilter::try_from_env("LWCP_LOG")
        .unwrap_or_else(|_| EnvFilter::new("lwc_preview=info,lwcp_app=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("───────────────────────────────────────────────────────");
    tracing::info!("lwc-preview starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Base directory for per-user data (logs, remembered devices, output log)
pub fn data_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("lwc-preview")
}

fn get_log_directory() -> Result<PathBuf> {
    Ok(data_directory().join("logs"))
}
