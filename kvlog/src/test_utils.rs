use crate::args::Arg;
use crate::dispatch;
use crate::levels::Level;
use crate::logger::Logger;
use crate::sink::InMemorySink;

/// RAII guard for in-memory logging that handles cleanup
///
/// The default logger writes to [`InMemoryLoggingGuard::sink`] until the
/// guard is dropped, then it is reset to a stdout logger.
///
/// # Important
/// Tests using this guard MUST be marked with #[serial] since they
/// share the process-wide default logger.
pub struct InMemoryLoggingGuard {
    pub sink: InMemorySink,
}

impl InMemoryLoggingGuard {
    pub fn new(level: Level) -> Self {
        let sink = InMemorySink::new();
        dispatch::init(Logger::new([
            Arg::with_writer(sink.clone()),
            Arg::with_level(level),
        ]));
        Self { sink }
    }
}

impl Drop for InMemoryLoggingGuard {
    fn drop(&mut self) {
        dispatch::reset();
    }
}

/// Initialize in-memory logging for unit tests
///
/// # Example
/// ```rust
/// use kvlog::prelude::*;
/// use kvlog::test_utils::init_in_memory_logging;
///
/// // #[test]
/// // #[serial]
/// fn test_example() {
///     let guard = init_in_memory_logging(Level::Info);
///     info!("hello");
///     assert!(guard.sink.contents().contains("msg=\"hello\""));
/// }
/// # test_example();
/// ```
pub fn init_in_memory_logging(level: Level) -> InMemoryLoggingGuard {
    InMemoryLoggingGuard::new(level)
}
