/// Formatted message argument, see [`Arg::msg`](crate::args::Arg::msg).
///
/// ```
/// use kvlog::prelude::*;
///
/// let retries = 3;
/// assert_eq!(msg!("gave up after {retries} tries").field(), Some(("msg", "\"gave up after 3 tries\"")));
/// ```
#[macro_export]
macro_rules! msg {
    ($($arg:tt)+) => {
        $crate::args::Arg::msg(::std::format!($($arg)+))
    };
}

/// Logs a formatted message with the default logger.
///
/// Extra arguments can be given before the format string:
///
/// ```
/// use kvlog::prelude::*;
///
/// log!(Level::Warn, fields: [Arg::int("attempt", 2)], "slow response from {}", "db");
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, fields: [$($field:expr),* $(,)?], $($arg:tt)+) => {
        $crate::dispatch::log($level, [$($field,)* $crate::msg!($($arg)+)])
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::dispatch::log($level, [$crate::msg!($($arg)+)])
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::levels::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::levels::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::log!($crate::levels::Level::Warn, $($arg)+)
    };
}

/// Logs an error with a formatted message, evaluates to whether something was logged.
#[macro_export]
macro_rules! error {
    ($err:expr, fields: [$($field:expr),* $(,)?], $($arg:tt)+) => {
        $crate::dispatch::error($err, [$($field,)* $crate::msg!($($arg)+)])
    };
    ($err:expr, $($arg:tt)+) => {
        $crate::dispatch::error($err, [$crate::msg!($($arg)+)])
    };
}
