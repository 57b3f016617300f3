//! Structured logging for the lodsphere crates.
//!
//! Console output with uptime timestamps and module paths, plus JSON file
//! logging in debug builds. The filter comes from `RUST_LOG` when set and
//! from the config's `debug.log_level` otherwise.

use std::fs::File;
use std::path::Path;

use lodsphere_config::Config;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "lodsphere.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - whether to add the file layer
/// * `config` - optional configuration supplying the log level
///
/// ```no_run
/// use lodsphere_config::Config;
/// use lodsphere_log::init_logging;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build && let Some(log_file) = log_dir.and_then(open_log_file) {
        subscriber.with(json_file_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// Create `log_dir` and a fresh [`LOG_FILE_NAME`] inside it.
pub fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE_NAME)).ok()
}

/// Structured JSON layer for post-mortem log files.
pub fn json_file_layer<S>(log_file: File) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

/// Filter directive from the config, or [`DEFAULT_FILTER`] if it has none.
pub fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(filter_directive(None), "info");
        let filter = EnvFilter::new(filter_directive(None));
        assert!(filter.to_string().contains("info"));
    }

    #[test]
    fn test_config_level_wins() {
        let mut config = Config::default();
        config.debug.log_level = "debug,lodsphere_lod=trace".to_string();
        let directive = filter_directive(Some(&config));
        assert_eq!(directive, "debug,lodsphere_lod=trace");
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn test_blank_config_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        for directive in ["info", "warn,lodsphere_lod=debug", "error", "trace"] {
            assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
        }
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");
        assert!(open_log_file(&log_dir).is_some());
        assert!(log_dir.join(LOG_FILE_NAME).is_file());
    }

    #[test]
    fn test_json_file_layer_writes_parseable_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_file = open_log_file(temp_dir.path()).unwrap();

        let subscriber = tracing_subscriber::registry().with(json_file_layer(log_file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(passes = 3, "flight finished");
        });

        let contents = std::fs::read_to_string(temp_dir.path().join(LOG_FILE_NAME)).unwrap();
        let line = contents.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["fields"]["message"], "flight finished");
        assert_eq!(value["fields"]["passes"], 3);
        assert_eq!(value["target"], "lodsphere_log::tests");
    }
}
