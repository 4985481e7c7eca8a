//! Error types for configuration and installation of the logging system
//!
//! Logging calls themselves never fail, only setup does.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),
    #[error("invalid log output {0:?}, expected stdout or stderr")]
    InvalidOutput(String),
    #[error("a logger for the log crate is already installed")]
    LoggerAlreadySet,
}

pub type Result<T> = std::result::Result<T, Error>;
