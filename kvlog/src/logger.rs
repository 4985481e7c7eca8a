//! Leveled logger carrying inherited arguments
use crate::args::{
    AddSkip, Arg, DEBUG_CALLER_KEY, IfDebug, LEVEL_KEY, Message, NewLevel, Prefix, Producer,
    TIME_KEY, WithWriter,
};
use crate::caller::caller_location;
use crate::config::LoggerConfig;
use crate::levels::{Level, LevelGate};
use crate::pipeline::{handle_args, handler, handler_skip};
use crate::sink::Sink;
use chrono::Utc;
use std::cell::Cell;
use std::iter;
use std::panic::Location;

pub const DEFAULT_LEVEL: Level = Level::Info;

/// Prints structured `key=value` lines to a single output.
///
/// A logger owns a sink, a level gate and the arguments inherited by every
/// line it prints. It is never mutated after construction except through its
/// level gate, so it can be shared between threads freely.
#[derive(Debug, Clone)]
pub struct Logger {
    out: Sink,
    level: LevelGate,
    args: Vec<Arg>,
}

impl Logger {
    /// Creates a logger printing to stdout at [`Level::Info`] unless
    /// `options` say otherwise.
    ///
    /// Recognized options are [`Arg::with_level`], [`Arg::with_shared_level`],
    /// [`Arg::with_writer`], [`Arg::with_sink`] and [`Arg::with_default_writer`];
    /// the last one of each kind wins. Every other argument is inherited by the
    /// lines this logger prints.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        let out = Cell::new(None);
        let level = Cell::new(None);
        let args = handle_args(
            [Arg::with_level(DEFAULT_LEVEL), Arg::with_default_writer()]
                .into_iter()
                .chain(options),
            &mut [
                handler_skip(|new: NewLevel| level.set(Some(LevelGate::new(new.0)))),
                handler_skip(|gate: LevelGate| level.set(Some(gate))),
                handler_skip(|writer: WithWriter| out.set(Some(writer.into_sink()))),
                handler_skip(|sink: Sink| out.set(Some(sink))),
            ],
        );
        Self {
            out: out.into_inner().unwrap_or_else(Sink::stdout),
            level: level
                .into_inner()
                .unwrap_or_else(|| LevelGate::new(DEFAULT_LEVEL)),
            args,
        }
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        Self::new(config.into_args())
    }

    /// Creates a child logger embedding `args` into each of its lines.
    ///
    /// The child shares the sink and the level gate of its parent unless
    /// `args` override them.
    pub fn with<I>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        Self::new(
            self.args
                .iter()
                .cloned()
                .chain([
                    Arg::Sink(self.out.clone()),
                    Arg::SharedLevel(self.level.clone()),
                ])
                .chain(args),
        )
    }

    pub fn level(&self) -> Level {
        self.level.get()
    }

    pub fn set_level(&self, level: Level) {
        self.level.set(level);
    }

    pub fn level_gate(&self) -> &LevelGate {
        &self.level
    }

    pub fn sink(&self) -> &Sink {
        &self.out
    }

    /// Arguments inherited by every line.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.level.can_print(level)
    }

    pub fn flush(&self) {
        self.out.flush();
    }

    /// Logs `args` at `level`.
    ///
    /// While [`Level::Debug`] is enabled the line starts with the location of
    /// the caller, or of a frame further up when [`Arg::add_skip`] is given.
    #[track_caller]
    pub fn log<I>(&self, level: Level, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        let location = Location::caller();
        self.log_with(
            level,
            |skip| caller_location(DEBUG_CALLER_KEY, location, skip),
            args,
        );
    }

    /// `caller` receives the frames to skip and is only called when the debug
    /// level is enabled.
    pub(crate) fn log_with<I, C>(&self, level: Level, caller: C, args: I)
    where
        I: IntoIterator<Item = Arg>,
        C: FnOnce(usize) -> Arg,
    {
        if let Some((out, line)) = self.format(level, caller, args) {
            out.write_line(&line);
        }
    }

    /// Same as [`Logger::log_with`] but drops the line instead of waiting for
    /// the sink, returns whether it was written.
    pub(crate) fn try_log_with<I, C>(&self, level: Level, caller: C, args: I) -> bool
    where
        I: IntoIterator<Item = Arg>,
        C: FnOnce(usize) -> Arg,
    {
        self.format(level, caller, args)
            .is_some_and(|(out, line)| out.try_write_line(&line))
    }

    /// Destination and fields of a line, `None` when `level` is disabled.
    fn format<I, C>(&self, level: Level, caller: C, args: I) -> Option<(Sink, Vec<Arg>)>
    where
        I: IntoIterator<Item = Arg>,
        C: FnOnce(usize) -> Arg,
    {
        let now = Utc::now();
        if !self.level.can_print(level) {
            return None;
        }
        let debug = self.level.can_print(Level::Debug);

        let mut out = None;
        let mut skip = 0;
        let mut msg = Message::default();
        let mut prefixes = Vec::with_capacity(self.args.len());
        let args = handle_args(
            self.args.iter().cloned().chain(args),
            &mut [
                handler_skip(|writer: WithWriter| out = Some(writer.into_sink())),
                handler_skip(|delta: AddSkip| skip = delta.add(skip)),
                handler_skip(|m: Message| msg = m),
                handler_skip(|p: Prefix| prefixes.push(Arg::Prefix(p))),
                handler(|p: Producer| p.produce()),
                handler(|id: IfDebug| if debug { id.produce() } else { Arg::Skip }),
            ],
        );

        let location = if debug { caller(skip) } else { Arg::Skip };
        let mut line = Vec::with_capacity(4 + prefixes.len() + args.len());
        line.push(location);
        line.push(Arg::time(TIME_KEY, &now));
        line.push(Arg::key_value(LEVEL_KEY, level.as_str()));
        line.extend(prefixes);
        line.push(Arg::Message(msg));
        line.extend(args);

        Some((out.unwrap_or_else(|| self.out.clone()), line))
    }

    /// Logs at [`Level::Debug`].
    #[track_caller]
    pub fn debug<I>(&self, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.log(Level::Debug, args);
    }

    /// Logs at [`Level::Info`].
    #[track_caller]
    pub fn info<I>(&self, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.log(Level::Info, args);
    }

    /// Logs at [`Level::Warn`].
    #[track_caller]
    pub fn warn<I>(&self, args: I)
    where
        I: IntoIterator<Item = Arg>,
    {
        self.log(Level::Warn, args);
    }

    /// Logs `err` at [`Level::Error`] under [`crate::args::ERROR_KEY`].
    ///
    /// Returns whether an error was given, nothing is logged for `None`.
    #[track_caller]
    pub fn error<I>(&self, err: Option<&dyn std::error::Error>, args: I) -> bool
    where
        I: IntoIterator<Item = Arg>,
    {
        match err {
            Some(err) => {
                self.log(Level::Error, iter::once(Arg::err(Some(err))).chain(args));
                true
            }
            None => false,
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new([])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::InMemorySink;

    fn capture(options: impl IntoIterator<Item = Arg>) -> (Logger, InMemorySink) {
        let buffer = InMemorySink::new();
        let logger = Logger::new(
            [Arg::with_writer(buffer.clone())]
                .into_iter()
                .chain(options),
        );
        (logger, buffer)
    }

    /// Line without its leading `time=` field.
    fn untimed(line: &str) -> &str {
        assert!(line.starts_with("time="), "{line}");
        line.split_once(' ').map_or("", |(_, rest)| rest)
    }

    #[test]
    fn defaults() {
        let logger = Logger::default();
        assert_eq!(logger.level(), Level::Info);
        assert!(logger.sink().ptr_eq(&Sink::stdout()));
        assert!(logger.args().is_empty());
    }

    #[test]
    fn construction_options_are_consumed() {
        let (logger, _) = capture([
            Arg::with_level(Level::Warn),
            Arg::string("svc", "api"),
            Arg::prefix("http"),
        ]);
        assert_eq!(logger.level(), Level::Warn);
        assert_eq!(logger.args().len(), 2);
    }

    #[test]
    fn info_line() {
        let (logger, buffer) = capture([]);
        logger.info([Arg::string("k", "v")]);
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(untimed(&lines[0]), r#"level=INFO msg="" k="v""#);
        assert!(buffer.contents().ends_with('\n'));
    }

    #[test]
    fn field_order() {
        let (logger, buffer) = capture([Arg::prefix("svc"), Arg::int("pid", 7)]);
        logger.warn([
            Arg::int("a", 1),
            Arg::msg("first"),
            Arg::prefix("req"),
            Arg::int("b", 2),
            Arg::msg("second"),
        ]);
        assert_eq!(
            untimed(&buffer.lines()[0]),
            r#"level=WARN prefix=SVC prefix=REQ msg="second" pid=7 a=1 b=2"#
        );
    }

    #[test]
    fn gated_calls_print_nothing() {
        let (logger, buffer) = capture([Arg::with_level(Level::Warn)]);
        logger.info([Arg::msg("hidden")]);
        logger.debug([Arg::msg("hidden")]);
        assert!(buffer.is_empty());
        logger.warn([Arg::msg("shown")]);
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn debug_adds_location() {
        let (logger, buffer) = capture([Arg::with_level(Level::Debug)]);
        logger.info([]);
        let line = buffer.contents();
        let expected = format!("loc={}:", file!());
        assert!(line.starts_with(&expected), "{line}");
        assert!(line.contains(" time="), "{line}");
    }

    #[test]
    fn error_reports_whether_it_logged() {
        let (logger, buffer) = capture([]);
        assert!(!logger.error(None, [Arg::msg("nothing")]));
        assert!(buffer.is_empty());
        let err = std::io::Error::other("boom");
        assert!(logger.error(Some(&err), [Arg::msg("failed")]));
        assert_eq!(
            untimed(&buffer.lines()[0]),
            r#"level=ERROR msg="failed" error="boom""#
        );
    }

    #[test]
    fn writer_override_for_one_call() {
        let (logger, buffer) = capture([]);
        let other = InMemorySink::new();
        logger.info([Arg::with_writer(other.clone()), Arg::int("n", 1)]);
        logger.info([Arg::int("n", 2)]);
        assert_eq!(other.lines().len(), 1);
        assert!(other.contents().contains("n=1"));
        assert_eq!(buffer.lines().len(), 1);
        assert!(buffer.contents().contains("n=2"));
    }

    #[test]
    fn construction_options_in_calls_are_dropped() {
        let (logger, buffer) = capture([]);
        logger.info([Arg::with_level(Level::None), Arg::add_skip(4)]);
        assert_eq!(logger.level(), Level::Info);
        assert_eq!(untimed(&buffer.lines()[0]), r#"level=INFO msg="""#);
    }

    #[test]
    fn child_shares_sink_and_level() {
        let (parent, buffer) = capture([Arg::string("app", "x")]);
        let child = parent.with([Arg::int("req", 1)]);
        assert!(child.sink().ptr_eq(parent.sink()));
        assert!(child.level_gate().ptr_eq(parent.level_gate()));
        parent.set_level(Level::Error);
        assert_eq!(child.level(), Level::Error);
        child.error(Some(&std::fmt::Error), []);
        assert!(buffer.contents().contains(r#" app="x" req=1"#));
    }

    #[test]
    fn child_with_its_own_level() {
        let (parent, _) = capture([]);
        let child = parent.with([Arg::with_level(Level::Debug)]);
        assert!(!child.level_gate().ptr_eq(parent.level_gate()));
        parent.set_level(Level::Warn);
        assert_eq!(child.level(), Level::Debug);
    }
}
