//! Structured logging crate
//!
//! Prints leveled `key=value` lines, each logger carrying fields inherited by
//! the children derived from it.
//!
//! Everything given to a logger is an [`args::Arg`]. Some arguments are
//! printable fields, others are directives consumed before the line is
//! written: the level and writer of a logger, the message of a line, prefixes,
//! or producers evaluated lazily at log time. A line always reads
//! `[loc=...] time=... level=... [prefix=...] msg="..." [key=value ...]`, the
//! location only being present while the debug level is enabled.
//!
//! # Examples
//! ```
//! use kvlog::prelude::*;
//! use kvlog::sink::InMemorySink;
//!
//! let out = InMemorySink::new();
//! let logger = Logger::new([Arg::with_writer(out.clone()), Arg::prefix("api")]);
//!
//! // children share the writer and the level of their parent
//! let request = logger.with([Arg::int("request_id", 12)]);
//! request.info([msg!("accepted"), Arg::string("path", "/users")]);
//!
//! // debug fields are only computed when they would be printed
//! request.info([Arg::if_debug(|| Arg::string("headers", "expensive"))]);
//!
//! let lines = out.lines();
//! assert!(lines[0].ends_with(r#"level=INFO prefix=API msg="accepted" request_id=12 path="/users""#));
//! assert!(!lines[1].contains("headers"));
//!
//! // the process-wide default logger
//! kvlog::dispatch::info([msg!("hello world")]);
//! ```
//!

#[macro_use]
extern crate lazy_static;

pub mod args;
mod caller;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod levels;
#[cfg(feature = "log_interop")]
pub mod log_interop;
pub mod logger;
pub mod panic_hook;
mod pipeline;
pub mod sink;
pub mod test_utils;

#[macro_use]
mod macros;

pub mod prelude {
    pub use crate::args::Arg;
    pub use crate::levels::*;
    pub use crate::logger::Logger;
    pub use crate::{debug, error, info, log, msg, warn};
}
