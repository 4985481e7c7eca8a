//! Log levels and the shared level gate
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Severity of a log call, also used as the threshold of a logger.
///
/// The order is total: `All < Debug < Info < Warn < Error < None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Prints at all levels.
    All,
    /// Meant for development, adds the caller location to every line.
    Debug,
    /// Verbose logging.
    #[default]
    Info,
    /// Only warnings and errors are printed.
    #[serde(alias = "warning")]
    Warn,
    /// Only errors are printed.
    Error,
    /// Nothing is printed.
    #[serde(alias = "off")]
    None,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::All | Level::None => "UNKNOWN",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Level::All),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "none" | "off" => Ok(Level::None),
            _ => Err(Error::InvalidLevel(s.to_owned())),
        }
    }
}

/// Threshold shared by a logger and the children derived from it.
///
/// Cloning the gate shares it; use [`LevelGate::new`] to fork a fresh one.
#[derive(Debug, Clone)]
pub struct LevelGate {
    level: Arc<Mutex<Level>>,
}

impl LevelGate {
    pub fn new(level: Level) -> Self {
        Self {
            level: Arc::new(Mutex::new(level)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Level> {
        self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> Level {
        *self.lock()
    }

    pub fn set(&self, level: Level) {
        *self.lock() = level;
    }

    /// True when a call at `test` passes the current threshold.
    pub fn can_print(&self, test: Level) -> bool {
        test >= *self.lock()
    }

    /// True when both handles point at the same shared level.
    pub fn ptr_eq(&self, other: &LevelGate) -> bool {
        Arc::ptr_eq(&self.level, &other.level)
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::new(Level::default())
    }
}
