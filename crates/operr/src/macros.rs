// SPDX-License-Identifier: MIT OR Apache-2.0
//! Formatting constructor.

/// Build an [`Error`](crate::Error) with the process-wide default code and a
/// formatted message.
///
/// Arguments are `cause, operation, format, args...`. The caller's location
/// and stack are captured like any other constructor.
///
/// ```
/// let err = operr::errorf!(None, "jobs.retry", "gave up after {} tries", 3);
/// assert_eq!(err.code, "internal");
/// assert_eq!(err.message, "gave up after 3 tries");
/// assert_eq!(err.operation, "jobs.retry");
/// ```
#[macro_export]
macro_rules! errorf {
    ($cause:expr, $operation:expr, $($arg:tt)+) => {
        $crate::Error::with_default_code($cause, ::std::format!($($arg)+), $operation)
    };
}
