//! Logging setup for Glint with file output and optional stdout.
//!
//! Logs always go to a file at `warn` level (or higher if configured).
//! Stdout logging is enabled when `GLINT_LOG` or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`GLINT_LOG`** (highest priority) - Glint-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for glint crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/glint/logs/glint-<pid>.log`
//! - macOS: `~/Library/Application Support/glint/logs/glint-12345.log`
//! - Linux: `~/.local/share/glint/logs/glint-12345.log`
//!
//! Override with [`LogConfig::log_file_path`] or `GLINT_LOG_FILE`.

use std::{env, path::PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// This function respects the environment variable priority described in the module docs:
/// `GLINT_LOG` > `RUST_LOG` > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
///
/// Safe to call multiple times -- will not crash if logging is already initialized.
pub fn init(config: LogConfig) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = create_file_filter();
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(file_filter);

    let stdout_enabled =
        env::var("GLINT_LOG").is_ok() || env::var("RUST_LOG").is_ok() || cfg!(debug_assertions);

    let stdout_layer = if stdout_enabled {
        Some(fmt::layer().with_filter(create_filter()))
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Identical to [`init`] but stdout-only (no file output), with a name that makes it
/// clear this is safe for test usage. Will not crash if called multiple times or if
/// logging is already initialized by another test.
pub fn test() {
    let _ = fmt().with_env_filter(create_filter()).try_init();
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("glint-{}.log", std::process::id());

    let override_path = override_path.or_else(|| env::var("GLINT_LOG_FILE").ok().map(Into::into));

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glint")
        .join("logs");

    (dir, filename)
}

/// File filter: uses user-specified level if set, otherwise defaults to `warn`.
fn create_file_filter() -> EnvFilter {
    if env::var("GLINT_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    EnvFilter::new("warn")
}

/// Create the appropriate [`EnvFilter`] based on environment variables.
///
/// Implements the priority system: `GLINT_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> EnvFilter {
    if let Ok(glint_log) = env::var("GLINT_LOG") {
        return expand_glint_log(&glint_log);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    // Default: warn globally, info for glint crates
    EnvFilter::new("warn,glint=info,glint_log=info")
}

/// Expand `GLINT_LOG` values into full tracing filter strings.
///
/// - `GLINT_LOG=debug` becomes `warn,glint=debug,glint_log=debug`
/// - `GLINT_LOG=glint=trace` is used as-is (advanced syntax)
fn expand_glint_log(glint_log: &str) -> EnvFilter {
    if glint_log.contains('=') || glint_log.contains(':') || glint_log.contains(',') {
        return EnvFilter::new(glint_log);
    }

    EnvFilter::new(format!("warn,glint={glint_log},glint_log={glint_log}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_log_path_defaults_to_data_dir() {
        let (dir, name) = resolve_log_path(None);
        assert!(dir.ends_with("glint/logs") || dir == PathBuf::from("."));
        assert!(name.starts_with("glint-"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn resolve_log_path_with_file_override() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/custom/my.log")));
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
        assert_eq!(name, "my.log");
    }

    #[test]
    fn resolve_log_path_with_dir_override() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logdir")));
        assert_eq!(dir, PathBuf::from("/tmp/logdir"));
        assert!(name.starts_with("glint-"));
    }
}
