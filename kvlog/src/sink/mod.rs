//! Destinations where formatted log lines are written
mod writer;
pub use writer::*;

pub mod in_memory_sink;
pub use in_memory_sink::InMemorySink;
