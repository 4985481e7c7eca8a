//! Single pass dispatch of arguments to typed handlers
//!
//! Each argument is offered to the handlers in their declared order; the first
//! handler bound to the argument's variant replaces it with its return value.
//! Arguments no handler claims are kept unchanged, and every resulting
//! [`Arg::Skip`] is dropped from the output.
use crate::args::{Arg, Variant};

/// Returns `Ok(replacement)` when the argument was handled, `Err(arg)` otherwise.
pub(crate) type Handler<'a> = Box<dyn FnMut(Arg) -> Result<Arg, Arg> + 'a>;

/// Handler bound to the variant whose payload is `T`.
pub(crate) fn handler<'a, T, F>(mut fun: F) -> Handler<'a>
where
    T: Variant + 'a,
    F: FnMut(T) -> Arg + 'a,
{
    Box::new(move |arg| T::take(arg).map(&mut fun))
}

/// Same as [`handler`] but every argument it catches is consumed.
pub(crate) fn handler_skip<'a, T, F>(mut fun: F) -> Handler<'a>
where
    T: Variant + 'a,
    F: FnMut(T) + 'a,
{
    handler(move |payload: T| {
        fun(payload);
        Arg::Skip
    })
}

pub(crate) fn handle_args<I>(args: I, handlers: &mut [Handler<'_>]) -> Vec<Arg>
where
    I: IntoIterator<Item = Arg>,
{
    let args = args.into_iter();
    let mut out = Vec::with_capacity(args.size_hint().0);
    for arg in args {
        let arg = handle_arg(arg, handlers);
        if !arg.is_skip() {
            out.push(arg);
        }
    }
    out
}

fn handle_arg(mut arg: Arg, handlers: &mut [Handler<'_>]) -> Arg {
    for handler in handlers.iter_mut() {
        match handler(arg) {
            Ok(replacement) => return replacement,
            Err(unhandled) => arg = unhandled,
        }
    }
    arg
}
