//! Log output for the server process.
//!
//! `RUST_LOG` takes precedence over the configured level. Without it, the
//! configured level applies to this crate and the transport stacks (hyper,
//! h2, tower, sqlx) are held at `warn` or quieter.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{MailError, Result};

const QUIET_DEPENDENCIES: &[&str] = &["hyper", "h2", "tower", "sqlx"];

/// Normalize a configured level name. Unknown names fall back to `info`.
fn level_name(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        "off" => "off",
        _ => "info",
    }
}

/// Filter directives used when `RUST_LOG` is not set.
fn default_directives(level: &str) -> String {
    let level = level_name(level);
    let mut directives = level.to_string();
    for target in QUIET_DEPENDENCIES {
        // Dependencies never log louder than the crate itself
        let dep_level = match level {
            "trace" | "debug" | "info" => "warn",
            other => other,
        };
        directives.push_str(&format!(",{target}={dep_level}"));
    }
    directives
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Open the log file for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::options().create(true).append(true).open(path)?)
}

/// Install the global subscriber.
///
/// Output goes to stdout, and is also appended to `config.file` when set.
/// Fails if the file cannot be opened or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(&config.level);

    let installed = match config.file.as_deref() {
        Some(path) => {
            let log_file = Arc::new(open_log_file(Path::new(path))?);
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stdout.and(log_file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .with(filter)
            .try_init(),
    };

    installed.map_err(|e| MailError::Config(format!("cannot install logger: {e}")))
}

/// Stdout-only logging, used when [`init`] fails.
///
/// Does nothing if a subscriber is already installed.
pub fn init_console_only(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(env_filter(level))
        .try_init();
}
