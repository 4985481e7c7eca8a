//! Reports panics as error lines through the default logger
use crate::args::Arg;
use crate::dispatch;
use crate::levels::Level;
use std::io::Write;
use std::panic::{PanicHookInfo, take_hook};
use std::sync::{Mutex, PoisonError};

pub const PANIC_LOCATION_KEY: &str = "panic_loc";

/// Installs the hook once, the previous hook is still called afterwards.
///
/// A panic raised while the default logger is writing is not logged, the
/// previous hook still reports it.
pub fn init_panic_hook() {
    type BoxedHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;
    static PREVIOUS_HOOK: Mutex<Option<BoxedHook>> = Mutex::new(None);

    {
        let mut previous_hook_lock = PREVIOUS_HOOK.lock().unwrap_or_else(PoisonError::into_inner);
        if previous_hook_lock.is_some() {
            return;
        }
        *previous_hook_lock = Some(take_hook());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        let logger = dispatch::global().load();
        // the panic may come from the writer of this logger, with its lock held
        let written = logger.try_log_with(
            Level::Error,
            |_| Arg::Skip,
            [
                Arg::msg(format!("panic: {}", payload_text(panic_info))),
                panic_info
                    .location()
                    .map_or(Arg::Skip, |l| Arg::location(PANIC_LOCATION_KEY, l)),
            ],
        );
        if written {
            logger.flush();
        }
        if let Ok(guard) = PREVIOUS_HOOK.lock()
            && let Some(hook) = guard.as_ref()
        {
            let _ = std::io::stdout().flush();
            hook(panic_info);
        }
    }));
}

fn payload_text<'a>(panic_info: &'a PanicHookInfo<'_>) -> &'a str {
    let payload = panic_info.payload();
    if let Some(text) = payload.downcast_ref::<&str>() {
        *text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.as_str()
    } else {
        "Box<dyn Any>"
    }
}
