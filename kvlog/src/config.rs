//! Logger configuration read from the environment or deserialized with serde
use crate::args::Arg;
use crate::errors::{Error, Result};
use crate::levels::Level;
use crate::sink::Sink;
use serde::Deserialize;
use std::str::FromStr;

pub const LEVEL_ENV_VAR: &str = "KVLOG_LEVEL";
pub const OUTPUT_ENV_VAR: &str = "KVLOG_OUTPUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
}

impl FromStr for Output {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Output::Stdout),
            "stderr" => Ok(Output::Stderr),
            _ => Err(Error::InvalidOutput(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: Level,
    pub output: Output,
}

impl LoggerConfig {
    /// Reads `KVLOG_LEVEL` and `KVLOG_OUTPUT`, unset or empty variables keep their default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(level) = var(LEVEL_ENV_VAR) {
            config.level = level.parse()?;
        }
        if let Some(output) = var(OUTPUT_ENV_VAR) {
            config.output = output.parse()?;
        }
        Ok(config)
    }

    /// Construction options for [`crate::logger::Logger::new`].
    pub fn into_args(self) -> Vec<Arg> {
        let writer = match self.output {
            Output::Stdout => Arg::with_default_writer(),
            Output::Stderr => Arg::with_sink(&Sink::stderr()),
        };
        vec![Arg::with_level(self.level), writer]
    }
}
