use crate::args::Arg;
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

pub type BoxedWriter = Box<dyn Write + Send>;

lazy_static! {
    static ref STDOUT: Sink = Sink::new(io::stdout());
    static ref STDERR: Sink = Sink::new(io::stderr());
}

/// Synchronized line writer.
///
/// Clones share the destination and its lock, so lines written through any
/// clone are never interleaved. Write errors are ignored.
#[derive(Clone)]
pub struct Sink {
    out: Arc<Mutex<BoxedWriter>>,
}

impl Sink {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Process-wide sink over [`io::stdout`], the default destination.
    pub fn stdout() -> Self {
        STDOUT.clone()
    }

    /// Process-wide sink over [`io::stderr`].
    pub fn stderr() -> Self {
        STDERR.clone()
    }

    pub fn ptr_eq(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.out, &other.out)
    }

    fn lock(&self) -> MutexGuard<'_, BoxedWriter> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the printable arguments as one `key=value ...` line.
    ///
    /// The whole line is written under the lock in a single call.
    pub fn write_line(&self, args: &[Arg]) {
        let line = format_line(args);
        let _ = self.lock().write_all(line.as_bytes());
    }

    /// Same as [`Sink::write_line`] but gives up when the lock is already
    /// held, returns whether the line was written.
    ///
    /// Used where the current thread may be the one holding the lock, such as
    /// a panic raised by the writer itself.
    pub fn try_write_line(&self, args: &[Arg]) -> bool {
        let mut out = match self.out.try_lock() {
            Ok(out) => out,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return false,
        };
        let _ = out.write_all(format_line(args).as_bytes());
        true
    }

    pub fn flush(&self) {
        let _ = self.lock().flush();
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("out", &Arc::as_ptr(&self.out))
            .finish()
    }
}

/// Renders the printable arguments of `args`, control arguments are ignored.
///
/// Keys and values are trimmed, fields with an empty key are dropped and only
/// the first empty value of a given key is kept.
pub fn format_line(args: &[Arg]) -> String {
    let mut out = Vec::with_capacity(args.len());
    let mut had_blank = HashSet::new();
    for (key, value) in args.iter().filter_map(Arg::field) {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }
        if value.is_empty() && !had_blank.insert(key) {
            continue;
        }
        out.push(format!("{key}={value}"));
    }
    let mut line = out.join(" ");
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Level;
    use crate::sink::InMemorySink;

    #[test]
    fn empty_values_are_kept_once_per_key() {
        let line = format_line(&[
            Arg::key_value("a", ""),
            Arg::key_value("a", "  "),
            Arg::key_value("a", "x"),
            Arg::key_value("b", ""),
            Arg::key_value("a", "x"),
        ]);
        assert_eq!(line, "a= a=x b= a=x\n");
    }

    #[test]
    fn trims_and_drops_empty_keys() {
        let line = format_line(&[
            Arg::key_value("  k ", " v  "),
            Arg::key_value("   ", "dropped"),
        ]);
        assert_eq!(line, "k=v\n");
    }

    #[test]
    fn control_arguments_are_not_printed() {
        let line = format_line(&[
            Arg::with_level(Level::Debug),
            Arg::skip(),
            Arg::add_skip(2),
            Arg::key_value("k", "v"),
        ]);
        assert_eq!(line, "k=v\n");
    }

    #[test]
    fn clones_share_the_destination() {
        let buffer = InMemorySink::new();
        let sink = Sink::new(buffer.clone());
        let other = sink.clone();
        sink.write_line(&[Arg::key_value("n", "1")]);
        other.write_line(&[Arg::key_value("n", "2")]);
        assert!(sink.ptr_eq(&other));
        assert_eq!(buffer.contents(), "n=1\nn=2\n");
    }

    #[test]
    fn try_write_line_gives_up_on_a_held_lock() {
        let buffer = InMemorySink::new();
        let sink = Sink::new(buffer.clone());
        {
            let _held = sink.lock();
            assert!(!sink.try_write_line(&[Arg::key_value("n", "1")]));
        }
        assert!(sink.try_write_line(&[Arg::key_value("n", "2")]));
        assert_eq!(buffer.contents(), "n=2\n");
    }

    #[test]
    fn stdout_is_shared() {
        assert!(Sink::stdout().ptr_eq(&Sink::stdout()));
        assert!(!Sink::stdout().ptr_eq(&Sink::stderr()));
    }
}
