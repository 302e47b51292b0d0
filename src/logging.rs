//! Logging configuration for the testing native library.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Once, RwLock};

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;

const LOGGER_STATE_UNINIT: u8 = 0;
const LOGGER_STATE_READY: u8 = 1;
const LOGGER_STATE_FAILED: u8 = 2;

static LOGGER_STATE: AtomicU8 = AtomicU8::new(LOGGER_STATE_UNINIT);
static LOGGER_INIT: Once = Once::new();
static NATIVE_LOGGER: Lazy<NativeLogger> = Lazy::new(NativeLogger::new);

#[derive(Clone)]
struct TargetFilter {
    target: String,
    level: LevelFilter,
}

#[derive(Clone)]
struct LogFilter {
    default: LevelFilter,
    directives: Vec<TargetFilter>,
}

impl LogFilter {
    fn default_for_level(level: LevelFilter) -> Self {
        Self {
            default: LevelFilter::Off,
            directives: vec![TargetFilter {
                target: "testing".to_string(),
                level,
            }],
        }
    }

    fn parse(spec: &str) -> Result<Self, String> {
        let mut default = LevelFilter::Off;
        let mut directives = Vec::new();

        for (index, raw) in spec.split(',').enumerate() {
            let directive = raw.trim();
            if directive.is_empty() {
                continue;
            }
            let mut parts = directive.splitn(2, '=');
            let left = parts.next().unwrap_or_default().trim();
            let right = parts.next().map(str::trim);

            if left.is_empty() {
                return Err(format!("empty log directive at position {index}"));
            }

            if let Some(level_str) = right {
                if level_str.is_empty() {
                    return Err(format!("missing log level for target `{left}`"));
                }
                let level =
                    parse_level(level_str).ok_or_else(|| format!("invalid level `{level_str}`"))?;
                directives.push(TargetFilter {
                    target: left.to_string(),
                    level,
                });
            } else if let Some(level) = parse_level(left) {
                default = level;
            } else {
                directives.push(TargetFilter {
                    target: left.to_string(),
                    level: LevelFilter::Trace,
                });
            }
        }

        Ok(Self { default, directives })
    }

    fn enabled(&self, metadata: &Metadata) -> bool {
        let target = metadata.target();
        let mut best_level = self.default;
        let mut best_len = 0usize;

        for directive in &self.directives {
            if target.starts_with(&directive.target) {
                let len = directive.target.len();
                if len >= best_len {
                    best_len = len;
                    best_level = directive.level;
                }
            }
        }

        let record_level = metadata.level().to_level_filter();
        record_level <= best_level
    }

    fn max_level(&self) -> LevelFilter {
        let mut max_level = self.default;
        for directive in &self.directives {
            if directive.level > max_level {
                max_level = directive.level;
            }
        }
        max_level
    }
}

struct NativeLogger {
    filter: RwLock<LogFilter>,
}

impl NativeLogger {
    fn new() -> Self {
        Self {
            filter: RwLock::new(LogFilter::default_for_level(LevelFilter::Info)),
        }
    }

    fn update(&self, filter: LogFilter) {
        let mut guard = self.filter.write().unwrap_or_else(|err| err.into_inner());
        *guard = filter;
    }

    fn with_filter<T>(&self, f: impl FnOnce(&LogFilter) -> T) -> T {
        let guard = self.filter.read().unwrap_or_else(|err| err.into_inner());
        f(&guard)
    }
}

impl Log for NativeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.with_filter(|filter| filter.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{} {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn resolve_filter() -> LogFilter {
    if let Ok(spec) = std::env::var("RUST_LOG") {
        match LogFilter::parse(&spec) {
            Ok(filter) => return filter,
            Err(message) => {
                eprintln!("testing: invalid RUST_LOG value `{spec}`: {message}");
            }
        }
    }
    LogFilter::default_for_level(LevelFilter::Info)
}

/// Installs the process logger and applies the filter from the environment.
///
/// Safe to call more than once; later calls only update the filter. If another
/// logger was installed first, this is a no-op.
pub(crate) fn init_from_env() {
    LOGGER_INIT.call_once(|| {
        if log::set_logger(&*NATIVE_LOGGER).is_ok() {
            LOGGER_STATE.store(LOGGER_STATE_READY, Ordering::SeqCst);
        } else {
            LOGGER_STATE.store(LOGGER_STATE_FAILED, Ordering::SeqCst);
        }
    });

    if LOGGER_STATE.load(Ordering::SeqCst) != LOGGER_STATE_READY {
        return;
    }

    let filter = resolve_filter();
    log::set_max_level(filter.max_level());
    NATIVE_LOGGER.update(filter);
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn parse_bare_level_sets_default() {
        let filter = LogFilter::parse("debug").expect("parse failed");
        assert!(filter.enabled(&metadata(Level::Debug, "anything")));
        assert!(!filter.enabled(&metadata(Level::Trace, "anything")));
    }

    #[test]
    fn parse_target_directive_overrides_default() {
        let filter = LogFilter::parse("warn,testing=trace").expect("parse failed");
        assert!(filter.enabled(&metadata(Level::Trace, "testing::native_lib")));
        assert!(filter.enabled(&metadata(Level::Warn, "other")));
        assert!(!filter.enabled(&metadata(Level::Info, "other")));
    }

    #[test]
    fn parse_bare_target_enables_trace() {
        let filter = LogFilter::parse("testing").expect("parse failed");
        assert!(filter.enabled(&metadata(Level::Trace, "testing")));
        assert!(!filter.enabled(&metadata(Level::Error, "other")));
    }

    #[test]
    fn longest_matching_prefix_wins() {
        let filter =
            LogFilter::parse("testing=error,testing::native_lib=debug").expect("parse failed");
        assert!(filter.enabled(&metadata(Level::Debug, "testing::native_lib")));
        assert!(!filter.enabled(&metadata(Level::Debug, "testing::greeting")));
    }

    #[test]
    fn parse_rejects_missing_level() {
        assert!(LogFilter::parse("testing=").is_err());
        assert!(LogFilter::parse("testing=loud").is_err());
    }

    #[test]
    fn max_level_covers_all_directives() {
        let filter = LogFilter::parse("warn,testing=debug").expect("parse failed");
        assert_eq!(filter.max_level(), LevelFilter::Debug);
    }

    #[test]
    fn default_filter_targets_this_library() {
        let filter = LogFilter::default_for_level(LevelFilter::Info);
        assert!(filter.enabled(&metadata(Level::Info, "testing::native_lib")));
        assert!(!filter.enabled(&metadata(Level::Info, "other")));
    }
}
