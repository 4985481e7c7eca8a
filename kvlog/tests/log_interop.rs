//! The `log` crate accepts a single logger per process, so everything
//! touching it lives in this one test.
#![cfg(feature = "log_interop")]

use kvlog::errors::Error;
use kvlog::log_interop::install_log_interop;
use kvlog::prelude::*;
use kvlog::test_utils::init_in_memory_logging;
use serial_test::serial;

mod utils;
use utils::untimed;

#[test]
#[serial]
fn log_records_reach_the_default_logger() {
    let guard = init_in_memory_logging(Level::Info);
    install_log_interop(None).expect("first installation");
    assert_eq!(log::max_level(), log::LevelFilter::Trace);
    assert_eq!(
        install_log_interop(Some(Level::Warn)),
        Err(Error::LoggerAlreadySet)
    );

    log::info!(target: "db", "connected to {}", "primary");
    log::debug!("filtered by the default logger");
    log::warn!("pool at {}%", 90);

    let lines: Vec<_> = guard.sink.lines().iter().map(|l| untimed(l)).collect();
    assert_eq!(
        lines,
        [
            r#"level=INFO msg="connected to primary" target=db"#,
            r#"level=WARN msg="pool at 90%" target=log_interop"#,
        ]
    );

    guard.sink.clear();
    kvlog::dispatch::set_level(Level::Debug);
    log::debug!("now enabled");
    assert!(guard.sink.contents().contains(r#"level=DEBUG msg="now enabled""#));

    guard.sink.clear();
    let line = line!() + 1;
    log::trace!("trace is logged at debug");
    let contents = guard.sink.contents();
    assert!(
        contents.starts_with(&format!("loc={}:{line} ", file!())),
        "{contents}"
    );
    assert!(contents.contains(r#"level=DEBUG msg="trace is logged at debug""#));
}
