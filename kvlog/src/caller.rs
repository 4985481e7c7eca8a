//! Caller location of a log call
//!
//! Public entry points are `#[track_caller]`, so the location of the call into
//! the library is known without looking at the stack. Skipping more frames,
//! through [`Arg::add_skip`], walks the stack from that call site.
use crate::args::Arg;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Location `skip` frames above the call site `location`, under `key`.
///
/// Produces [`Arg::Skip`] when the frames cannot be resolved.
pub(crate) fn caller_location(key: &str, location: &Location<'_>, skip: usize) -> Arg {
    if skip == 0 {
        return Arg::location(key, location);
    }
    let frames = resolve_frames();
    let mut above = frames
        .iter()
        .skip_while(|(file, line)| !is_call_site(file, *line, location));
    match above.nth(skip) {
        Some((file, line)) => Arg::key_value(key, format!("{}:{line}", file.display())),
        None => Arg::Skip,
    }
}

fn is_call_site(file: &Path, line: u32, location: &Location<'_>) -> bool {
    line == location.line() && file.ends_with(location.file())
}

/// Source locations of the current stack, innermost first.
///
/// Inlined calls are resolved as frames of their own, frames without debug
/// information are left out.
fn resolve_frames() -> Vec<(PathBuf, u32)> {
    let mut frames = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                frames.push((file.to_path_buf(), line));
            }
        });
        true
    });
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::DEBUG_CALLER_KEY;

    fn value(arg: &Arg) -> String {
        arg.field().map(|(_, v)| v.to_owned()).unwrap_or_default()
    }

    #[inline(never)]
    fn location_of_my_caller() -> Arg {
        caller_location(DEBUG_CALLER_KEY, Location::caller(), 1)
    }

    #[test]
    fn no_skip_keeps_the_call_site() {
        let line = line!() + 1;
        let arg = caller_location(DEBUG_CALLER_KEY, Location::caller(), 0);
        assert_eq!(value(&arg), format!("{}:{line}", file!()));
    }

    #[test]
    fn skip_walks_up_from_the_call_site() {
        let line = line!() + 1;
        let arg = location_of_my_caller();
        let value = value(&arg);
        assert!(value.ends_with(&format!("{}:{line}", file!())), "{value}");
    }

    #[test]
    fn unresolved_frames_are_skipped() {
        let here = Location::caller();
        assert!(!is_call_site(Path::new("/src/other.rs"), here.line(), here));
        assert!(caller_location(DEBUG_CALLER_KEY, here, usize::MAX).is_skip());
    }
}
