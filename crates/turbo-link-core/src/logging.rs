//! Tracing subscriber setup.

use crate::Result;
use chrono::Local;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use turbo_link_config::{LogFileNameFormat, LoggingConfig};

fn get_log_filename(format: &LogFileNameFormat) -> String {
    match format {
        LogFileNameFormat::Date => format!("turbo-link-{}.log", Local::now().format("%Y-%m-%d")),
        LogFileNameFormat::Timestamp => format!("turbo-link-{}.log", Local::now().timestamp()),
        LogFileNameFormat::DateTime => {
            format!("turbo-link-{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S"))
        }
        LogFileNameFormat::None => "turbo-link.log".to_string(),
    }
}

/// Creates a filter that honours `RUST_LOG` and otherwise uses the configured level.
fn tracing_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()))
}

/// Initializes the global tracing subscriber with a rolling file layer and an
/// optional stdout layer.
///
/// Writers are non-blocking; the returned guards flush them on drop and must be
/// kept alive for as long as logging is wanted.
///
/// # Errors
///
/// Returns [`CoreError::Logging`](crate::CoreError::Logging) if a global subscriber
/// is already installed.
///
/// # Examples
///
/// ```ignore
/// let config = turbo_link_config::ConnectorConfig::from_dir(None)?;
/// let _guards = turbo_link_core::logging::tracing(&log_dir, config.logging())?;
/// ```
pub fn tracing(log_dir: &Path, config: &LoggingConfig) -> Result<Vec<WorkerGuard>> {
    let file_appender = rolling::daily(log_dir, get_log_filename(&config.log_file));
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let mut guards = vec![file_guard];

    let stdout_layer = if config.log_to_stdout {
        let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(stdout_guard);

        Some(
            layer()
                .with_writer(stdout_writer)
                .with_file(false)
                .with_thread_names(true)
                .with_line_number(true)
                .with_level(true)
                .with_span_events(FmtSpan::CLOSE)
                .compact(),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(tracing_env_filter(config))
        .with(stdout_layer)
        .with(
            layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_file(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_level(true)
                .with_span_events(FmtSpan::CLOSE)
                .compact(),
        )
        .try_init()?;

    info!(
        log_dir = %log_dir.display(),
        level = config.log_level.as_directive(),
        stdout = config.log_to_stdout,
        "logging initialized"
    );

    Ok(guards)
}
