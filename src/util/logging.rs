//! Structured logging setup.
//!
//! Initializes the `tracing` subscriber with a stderr layer and, when the log
//! directory is writable, an ANSI-free file layer writing
//! `deployment_<unix_timestamp>.log`. Initialization is `Once`-guarded and
//! respects `RUST_LOG` when set.

use chrono::Utc;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging. Returns the per-run log file path, or `None` when the
/// file sink could not be created (logging then goes to stderr only).
pub fn init_logging(level: Level, log_dir: &Path) -> Option<PathBuf> {
    let mut log_path = None;

    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if std::env::var("RUST_LOG").is_err() {
            if let Ok(directive) = format!("shipwright={}", level).parse() {
                filter = filter.add_directive(directive);
            }
        }

        let file_layer = match open_log_file(log_dir) {
            Ok((file, path)) => {
                log_path = Some(path);
                Some(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
            }
            Err(e) => {
                eprintln!("warning: could not create log file in {}: {}", log_dir.display(), e);
                None
            }
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(file_layer)
            .init();
    });

    log_path
}

fn open_log_file(log_dir: &Path) -> std::io::Result<(File, PathBuf)> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(format!("deployment_{}.log", Utc::now().timestamp()));
    let file = File::create(&path)?;
    Ok((file, path))
}

/// Parse a log level string, defaulting to INFO on unrecognized input.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "unrecognized log level '{}', using info (valid: trace, debug, info, warn, error)",
                level_str
            );
            Level::INFO
        }
    }
}
