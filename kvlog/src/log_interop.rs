//! Forwards records of the `log` crate to the default logger
use crate::args::{Arg, DEBUG_CALLER_KEY};
use crate::dispatch;
use crate::errors::{Error, Result};
use crate::levels::Level;

pub const TARGET_KEY: &str = "target";

struct LogDispatch;

impl log::Log for LogDispatch {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        dispatch::global()
            .load()
            .enabled(log_level_to_kvlog_level(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let caller = |_: usize| match (record.file(), record.line()) {
            (Some(file), Some(line)) => Arg::key_value(DEBUG_CALLER_KEY, format!("{file}:{line}")),
            _ => Arg::Skip,
        };
        dispatch::global().load().log_with(
            log_level_to_kvlog_level(record.level()),
            caller,
            [
                Arg::key_value(TARGET_KEY, record.target()),
                Arg::msg(record.args().to_string()),
            ],
        );
    }

    fn flush(&self) {
        dispatch::global().load().flush();
    }
}

/// Installs a `log` crate dispatcher forwarding records to the default logger.
///
/// `max_level_override` caps what the `log` macros emit. When `None` every
/// record reaches the default logger, which gates it with its current level,
/// so later calls to [`dispatch::set_level`] apply to `log` records too.
/// Fails if another logger was already installed in the `log` crate.
pub fn install_log_interop(max_level_override: Option<Level>) -> Result<()> {
    static LOG_DISPATCHER: LogDispatch = LogDispatch;
    log::set_logger(&LOG_DISPATCHER).map_err(|_| Error::LoggerAlreadySet)?;
    log::set_max_level(
        max_level_override.map_or(log::LevelFilter::Trace, kvlog_level_to_log_level_filter),
    );
    Ok(())
}

/// There is no trace level here, trace records are logged at debug.
fn log_level_to_kvlog_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

pub(crate) fn kvlog_level_to_log_level_filter(level: Level) -> log::LevelFilter {
    match level {
        Level::All | Level::Debug => log::LevelFilter::Trace,
        Level::Info => log::LevelFilter::Info,
        Level::Warn => log::LevelFilter::Warn,
        Level::Error => log::LevelFilter::Error,
        Level::None => log::LevelFilter::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_mapping() {
        assert_eq!(log_level_to_kvlog_level(log::Level::Trace), Level::Debug);
        assert_eq!(log_level_to_kvlog_level(log::Level::Warn), Level::Warn);
        assert_eq!(
            kvlog_level_to_log_level_filter(Level::Debug),
            log::LevelFilter::Trace
        );
        assert_eq!(
            kvlog_level_to_log_level_filter(Level::None),
            log::LevelFilter::Off
        );
    }
}
