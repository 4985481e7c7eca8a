#![allow(dead_code)]
use kvlog::prelude::*;
use kvlog::sink::InMemorySink;

/// Logger writing to a fresh in-memory buffer.
pub fn capture(options: impl IntoIterator<Item = Arg>) -> (Logger, InMemorySink) {
    let buffer = InMemorySink::new();
    let logger = Logger::new([Arg::with_writer(buffer.clone())].into_iter().chain(options));
    (logger, buffer)
}

/// Strips the leading `time=` field, and the `loc=` field before it if any.
pub fn untimed(line: &str) -> String {
    let line = match line.strip_prefix("loc=") {
        Some(rest) => rest.split_once(' ').map_or("", |(_, rest)| rest),
        None => line,
    };
    assert!(line.starts_with("time="), "unexpected line {line:?}");
    line.split_once(' ').map_or("", |(_, rest)| rest).to_owned()
}
