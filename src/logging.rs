use crate::error::ConfigError;
use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

// Custom logger structure
#[derive(Debug)]
struct SkyLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl log::Log for SkyLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Debug topics can be narrowed with --debug-filter
        if let Some(filters) = &self.debug_filters {
            if metadata.level() >= log::Level::Debug {
                return filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f));
            }
        }
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");
        let message = record.args().to_string();

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {context}{target}: {message}",
            level = record.level(),
            context = context_prefix(&message),
            target = record.target(),
        );

        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        let mut stdout = io::stdout();
        let _ = writeln!(stdout, "{}", output);
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Number directly following `label` in `message`, e.g. "Level 3 cleared".
fn number_after(message: &str, label: &str) -> Option<u32> {
    let start = message.find(label)? + label.len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

// Topic macros already carry [Lnn][Tnnnnn]; plain messages get a level tag if they name one.
fn context_prefix(message: &str) -> String {
    if message.starts_with('[') {
        return String::new();
    }
    match number_after(message, "Level ") {
        Some(level) => format!("[L{:02}] ", level),
        None => String::new(),
    }
}

static LOGGER: OnceLock<SkyLogger> = OnceLock::new();

/// Maps a command-line level name to a filter.
pub fn parse_level(name: &str) -> Result<LevelFilter, ConfigError> {
    match name.to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(ConfigError::UnknownLogLevel(name.to_string())),
    }
}

// Initialize the logger with optional debug filters
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let debug_filters = debug_filter.map(|filter_str| {
        filter_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>()
    });

    let logger = LOGGER.get_or_init(|| SkyLogger {
        level,
        debug_filters,
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

// Helper macros for specific debug topics.
// Every call carries the level number and tick counter as context.
#[macro_export]
macro_rules! debug_world {
    ($level:expr, $tick:expr, $($arg:tt)+) => {
        log::debug!(target: "world", "[L{:02}][T{:05}] {}", $level, $tick, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug_flight {
    ($level:expr, $tick:expr, $($arg:tt)+) => {
        log::trace!(target: "flight", "[L{:02}][T{:05}] {}", $level, $tick, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug_collision {
    ($level:expr, $tick:expr, $($arg:tt)+) => {
        log::debug!(target: "collision", "[L{:02}][T{:05}] {}", $level, $tick, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug_radar {
    ($level:expr, $tick:expr, $($arg:tt)+) => {
        log::trace!(target: "radar", "[L{:02}][T{:05}] {}", $level, $tick, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug_session {
    ($level:expr, $tick:expr, $($arg:tt)+) => {
        log::debug!(target: "session", "[L{:02}][T{:05}] {}", $level, $tick, format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Ok(LevelFilter::Debug));
        assert_eq!(parse_level("off"), Ok(LevelFilter::Off));
        assert_eq!(
            parse_level("loud"),
            Err(ConfigError::UnknownLogLevel("loud".to_string()))
        );
    }

    #[test]
    fn test_context_prefix() {
        assert_eq!(context_prefix("Level 3 cleared"), "[L03] ");
        assert_eq!(context_prefix("[L01][T00010] coin"), "");
        assert_eq!(context_prefix("Starting main loop"), "");
        assert_eq!(number_after("Level x", "Level "), None);
    }

    fn meta(level: log::Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn test_debug_filters_limit_topics() {
        let mut filters = HashSet::new();
        filters.insert("collision".to_string());
        let logger = SkyLogger {
            level: LevelFilter::Trace,
            debug_filters: Some(filters),
        };

        assert!(logger.enabled(&meta(log::Level::Debug, "collision")));
        assert!(!logger.enabled(&meta(log::Level::Debug, "world")));
        assert!(!logger.enabled(&meta(log::Level::Trace, "flight")));
        // Info and above ignore topic filters
        assert!(logger.enabled(&meta(log::Level::Info, "world")));
    }

    #[test]
    fn test_level_threshold() {
        let logger = SkyLogger {
            level: LevelFilter::Warn,
            debug_filters: None,
        };
        assert!(!logger.enabled(&meta(log::Level::Info, "session")));
    }
}
