//! Arguments of a log call: printable fields and control directives
//!
//! Every [`Arg`] is either printable, exposing a key and a value, or a control
//! directive consumed by a logger before the line is written. Control
//! arguments that are not consumed never reach the output.
use crate::levels::{Level, LevelGate};
use crate::sink::Sink;
use chrono::{DateTime, SecondsFormat, TimeZone};
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const MSG_KEY: &str = "msg";
pub const PREFIX_KEY: &str = "prefix";
pub const ERROR_KEY: &str = "error";
pub const DEBUG_CALLER_KEY: &str = "loc";

/// Function producing an argument at log time.
pub type ArgFn = Arc<dyn Fn() -> Arg + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Printable,
    Control,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// Trimmed and quoted message printed under [`MSG_KEY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String);

impl Message {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Message {
    fn default() -> Self {
        Self(String::from("\"\""))
    }
}

/// Upper-cased label printed under [`PREFIX_KEY`], ahead of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix(String);

impl Prefix {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Forks a new level gate at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLevel(pub Level);

/// Overrides the destination, `None` selects stdout.
#[derive(Debug, Clone)]
pub struct WithWriter(pub Option<Sink>);

impl WithWriter {
    pub fn into_sink(self) -> Sink {
        self.0.unwrap_or_else(Sink::stdout)
    }
}

/// Increments the caller skip count of a single log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddSkip(pub usize);

impl AddSkip {
    pub fn add(self, skip: usize) -> usize {
        self.0 + skip
    }
}

/// Lazily evaluated argument, an unset function produces [`Arg::Skip`].
#[derive(Clone, Default)]
pub struct Producer(Option<ArgFn>);

impl Producer {
    pub fn produce(&self) -> Arg {
        self.0.as_ref().map_or(Arg::Skip, |f| f())
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Producer").field(&self.0.is_some()).finish()
    }
}

/// Like [`Producer`] but only evaluated while the debug level is enabled.
#[derive(Clone, Default)]
pub struct IfDebug(Option<ArgFn>);

impl IfDebug {
    pub fn produce(&self) -> Arg {
        self.0.as_ref().map_or(Arg::Skip, |f| f())
    }
}

impl fmt::Debug for IfDebug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IfDebug").field(&self.0.is_some()).finish()
    }
}

/// Something that can be printed in a log line or used to control its output.
#[derive(Debug, Clone)]
pub enum Arg {
    KeyValue(KeyValue),
    Message(Message),
    Prefix(Prefix),
    /// Produces nothing.
    Skip,
    NewLevel(NewLevel),
    SharedLevel(LevelGate),
    WithWriter(WithWriter),
    /// Existing sink to share, carried from a parent logger to its children.
    Sink(Sink),
    AddSkip(AddSkip),
    Producer(Producer),
    IfDebug(IfDebug),
}

/// Payload of one [`Arg`] variant, used to bind a handler to that variant.
pub(crate) trait Variant: Sized {
    fn take(arg: Arg) -> Result<Self, Arg>;
}

macro_rules! impl_variant {
    ($($variant:ident => $payload:ty),* $(,)?) => {
        $(
            impl Variant for $payload {
                fn take(arg: Arg) -> Result<Self, Arg> {
                    match arg {
                        Arg::$variant(payload) => Ok(payload),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_variant!(
    KeyValue => KeyValue,
    Message => Message,
    Prefix => Prefix,
    NewLevel => NewLevel,
    SharedLevel => LevelGate,
    WithWriter => WithWriter,
    Sink => Sink,
    AddSkip => AddSkip,
    Producer => Producer,
    IfDebug => IfDebug,
);

/// Integer types accepted by [`Arg::int`].
pub trait Integer: fmt::Display {}

/// Float types accepted by [`Arg::float`].
pub trait Float: fmt::Display {}

macro_rules! impl_marker {
    ($marker:ident: $($t:ty),*) => {
        $(impl $marker for $t {})*
    };
}

impl_marker!(Integer: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_marker!(Float: f32, f64);

fn quote(value: &str) -> String {
    format!("{value:?}")
}

/// Sub-second durations use the largest unit below a second, longer ones are
/// split in hours, minutes and seconds.
fn format_duration(value: Duration) -> String {
    const MICROS: u128 = 1_000;
    const MILLIS: u128 = 1_000_000;
    const SECS: u128 = 1_000_000_000;
    let nanos = value.as_nanos();
    match nanos {
        0 => return String::from("0s"),
        n if n < MICROS => return format!("{n}ns"),
        n if n < MILLIS => return decimal(n, MICROS, "µs"),
        n if n < SECS => return decimal(n, MILLIS, "ms"),
        _ => {}
    }
    let secs = value.as_secs();
    let seconds = decimal(nanos % (60 * SECS), SECS, "s");
    match (secs / 3600, secs / 60 % 60) {
        (0, 0) => seconds,
        (0, minutes) => format!("{minutes}m{seconds}"),
        (hours, minutes) => format!("{hours}h{minutes}m{seconds}"),
    }
}

/// `value / unit` followed by `suffix`, without trailing zero decimals.
fn decimal(value: u128, unit: u128, suffix: &str) -> String {
    let (int, frac) = (value / unit, value % unit);
    if frac == 0 {
        return format!("{int}{suffix}");
    }
    let width = unit.ilog10() as usize;
    let frac = format!("{frac:0width$}");
    format!("{int}.{}{suffix}", frac.trim_end_matches('0'))
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::KeyValue(_) | Arg::Message(_) | Arg::Prefix(_) => ArgKind::Printable,
            _ => ArgKind::Control,
        }
    }

    /// Key and value of a printable argument, untrimmed.
    pub fn field(&self) -> Option<(&str, &str)> {
        match self {
            Arg::KeyValue(kv) => Some((kv.key.as_str(), kv.value.as_str())),
            Arg::Message(msg) => Some((MSG_KEY, msg.as_str())),
            Arg::Prefix(prefix) => Some((PREFIX_KEY, prefix.as_str())),
            _ => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Arg::Skip)
    }

    pub fn skip() -> Arg {
        Arg::Skip
    }

    /// Raw key=value pair, the value is printed as is.
    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Arg {
        Arg::KeyValue(KeyValue {
            key: key.into(),
            value: value.into(),
        })
    }

    /// key=value pair with a quoted string value.
    pub fn string(key: impl Into<String>, value: impl AsRef<str>) -> Arg {
        Arg::key_value(key, quote(value.as_ref()))
    }

    pub fn int<N: Integer>(key: impl Into<String>, value: N) -> Arg {
        Arg::key_value(key, value.to_string())
    }

    /// Printed with six decimals.
    pub fn float<N: Float>(key: impl Into<String>, value: N) -> Arg {
        Arg::key_value(key, format!("{value:.6}"))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Arg {
        Arg::key_value(key, value.to_string())
    }

    /// Unquoted duration such as `0s`, `250ms`, `1.5s` or `1h2m3s`.
    pub fn duration(key: impl Into<String>, value: Duration) -> Arg {
        Arg::key_value(key, format_duration(value))
    }

    /// Unquoted RFC 3339 timestamp with second precision.
    pub fn time<Tz>(key: impl Into<String>, value: &DateTime<Tz>) -> Arg
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Arg::key_value(key, value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Location of the caller, as `file:line`.
    #[track_caller]
    pub fn caller(key: impl Into<String>) -> Arg {
        Arg::location(key, Location::caller())
    }

    pub(crate) fn location(key: impl Into<String>, location: &Location<'_>) -> Arg {
        Arg::key_value(key, format!("{}:{}", location.file(), location.line()))
    }

    /// Quoted error under [`ERROR_KEY`], `None` produces [`Arg::Skip`].
    pub fn err(err: Option<&dyn std::error::Error>) -> Arg {
        match err {
            Some(err) => Arg::key_value(ERROR_KEY, quote(err.to_string().trim())),
            None => Arg::Skip,
        }
    }

    /// Trimmed and quoted message, only the last one given to a call is printed.
    ///
    /// See [`crate::msg!`] for a formatting version.
    pub fn msg(text: impl AsRef<str>) -> Arg {
        Arg::Message(Message(quote(text.as_ref().trim())))
    }

    /// Label printed before the message.
    ///
    /// The label is trimmed, inner spaces become underscores and it is
    /// upper-cased. An empty label produces [`Arg::Skip`].
    pub fn prefix(label: impl AsRef<str>) -> Arg {
        let label = label.as_ref().trim();
        if label.is_empty() {
            return Arg::Skip;
        }
        Arg::Prefix(Prefix(label.replace(' ', "_").to_uppercase()))
    }

    pub fn add_skip(skip: usize) -> Arg {
        Arg::AddSkip(AddSkip(skip))
    }

    /// Argument created at log time, once per call.
    pub fn producer<F>(producer: F) -> Arg
    where
        F: Fn() -> Arg + Send + Sync + 'static,
    {
        Arg::Producer(Producer(Some(Arc::new(producer))))
    }

    /// Argument created at log time, only when [`Level::Debug`] is enabled.
    pub fn if_debug<F>(producer: F) -> Arg
    where
        F: Fn() -> Arg + Send + Sync + 'static,
    {
        Arg::IfDebug(IfDebug(Some(Arc::new(producer))))
    }

    /// Creates a new shared level for this logger and its future children.
    pub fn with_level(level: Level) -> Arg {
        Arg::NewLevel(NewLevel(level))
    }

    /// Reuses an existing level gate, changes to it apply to every logger sharing it.
    pub fn with_shared_level(gate: &LevelGate) -> Arg {
        Arg::SharedLevel(gate.clone())
    }

    /// Writes to `writer`, each line is written under a lock and errors are ignored.
    pub fn with_writer<W>(writer: W) -> Arg
    where
        W: Write + Send + 'static,
    {
        Arg::WithWriter(WithWriter(Some(Sink::new(writer))))
    }

    /// Writes to an existing sink, sharing its lock.
    pub fn with_sink(sink: &Sink) -> Arg {
        Arg::WithWriter(WithWriter(Some(sink.clone())))
    }

    /// Writes to stdout.
    pub fn with_default_writer() -> Arg {
        Arg::WithWriter(WithWriter(None))
    }
}
