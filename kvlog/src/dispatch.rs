//! Process-wide default logger
//!
//! The free functions of this module delegate to the logger currently held by
//! [`global`]. It starts as a stdout logger at [`Level::Info`] and can be
//! replaced at any time with [`init`], [`add`] or [`reset`]. Code that wants an
//! isolated instance can build its own [`SharedLogger`] or plain [`Logger`].
pub use crate::errors::{Error, Result};
use crate::args::Arg;
use crate::config::LoggerConfig;
use crate::levels::Level;
use crate::logger::Logger;
use std::sync::{Arc, PoisonError, RwLock};

/// Swappable handle to a logger.
#[derive(Debug)]
pub struct SharedLogger {
    current: RwLock<Arc<Logger>>,
}

impl SharedLogger {
    pub fn new(logger: Logger) -> Self {
        Self {
            current: RwLock::new(Arc::new(logger)),
        }
    }

    pub fn load(&self) -> Arc<Logger> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store(&self, logger: Logger) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(logger);
    }

    /// Replaces the current logger with a child embedding `args`.
    pub fn add<I>(&self, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let child = current.with(args);
        *current = Arc::new(child);
    }

    /// Replaces the current logger with a fresh default one.
    pub fn reset(&self) {
        self.store(Logger::default());
    }
}

impl Default for SharedLogger {
    fn default() -> Self {
        Self::new(Logger::default())
    }
}

lazy_static! {
    static ref G_LOGGER: SharedLogger = SharedLogger::default();
}

pub fn global() -> &'static SharedLogger {
    &G_LOGGER
}

pub fn init(logger: Logger) {
    G_LOGGER.store(logger);
}

/// Replaces the default logger with one configured from `KVLOG_LEVEL` and `KVLOG_OUTPUT`.
pub fn init_from_env() -> Result<()> {
    let config = LoggerConfig::from_env()?;
    init(Logger::from_config(config));
    Ok(())
}

pub fn add<I>(args: I)
where
    I: IntoIterator<Item = Arg>,
{
    G_LOGGER.add(args);
}

pub fn with<I>(args: I) -> Logger
where
    I: IntoIterator<Item = Arg>,
{
    G_LOGGER.load().with(args)
}

pub fn reset() {
    G_LOGGER.reset();
}

pub fn get_level() -> Level {
    G_LOGGER.load().level()
}

pub fn set_level(level: Level) {
    G_LOGGER.load().set_level(level);
}

#[track_caller]
pub fn log<I>(level: Level, args: I)
where
    I: IntoIterator<Item = Arg>,
{
    G_LOGGER.load().log(level, args);
}

#[track_caller]
pub fn debug<I>(args: I)
where
    I: IntoIterator<Item = Arg>,
{
    G_LOGGER.load().debug(args);
}

#[track_caller]
pub fn info<I>(args: I)
where
    I: IntoIterator<Item = Arg>,
{
    G_LOGGER.load().info(args);
}

#[track_caller]
pub fn warn<I>(args: I)
where
    I: IntoIterator<Item = Arg>,
{
    G_LOGGER.load().warn(args);
}

#[track_caller]
pub fn error<I>(err: Option<&dyn std::error::Error>, args: I) -> bool
where
    I: IntoIterator<Item = Arg>,
{
    G_LOGGER.load().error(err, args)
}
