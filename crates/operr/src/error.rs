// SPDX-License-Identifier: MIT OR Apache-2.0
//! The structured [`Error`] value and its constructors.

use std::fmt;

use crate::BoxError;
use crate::capture::{Capture, Frames, StackFrame};
use crate::code::ErrorCode;

/// Structured application error.
///
/// Carries a machine-readable code, a human-readable message, the logical
/// operation in progress, an optional wrapped cause, and the call site and
/// call stack captured when it was built.
///
/// Empty `code` and `message` mean "unset": [`code`](crate::code) and
/// [`message`](crate::message) then resolve them from the cause chain or from
/// the configured [`Defaults`](crate::Defaults).
///
/// # Construction
///
/// ```
/// use operr::{Error, ErrorCode};
///
/// let err = Error::not_found(None, "no such user", "users.find");
/// assert_eq!(err.code, "not_found");
/// assert_eq!(err.http_status_code(), 404);
///
/// let err = Error::new(None, "bad input", ErrorCode::Invalid, "users.create");
/// assert_eq!(err.error_code(), Some(ErrorCode::Invalid));
/// ```
#[derive(Default)]
pub struct Error {
    /// Machine-readable code; usually one of [`ErrorCode`], but any string is
    /// accepted.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Logical operation in progress when the error was raised.
    pub operation: String,
    /// Optional underlying cause.
    pub cause: Option<BoxError>,
    pub(crate) location: String,
    pub(crate) frames: Frames,
}

// ── Constructors ──────────────────────────────────────────────────

impl Error {
    /// Create an error, capturing the caller's location and call stack.
    ///
    /// The code is stored verbatim; unrecognised codes are only treated
    /// specially by [`Error::http_status_code`].
    #[track_caller]
    #[inline(never)]
    pub fn new(
        cause: Option<BoxError>,
        message: impl Into<String>,
        code: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            code.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the process-wide default code.
    #[track_caller]
    #[inline(never)]
    pub fn with_default_code(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            crate::global_defaults().code,
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the [`ErrorCode::Conflict`] code.
    #[track_caller]
    #[inline(never)]
    pub fn conflict(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            ErrorCode::Conflict.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the [`ErrorCode::Internal`] code.
    #[track_caller]
    #[inline(never)]
    pub fn internal(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            ErrorCode::Internal.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the [`ErrorCode::Invalid`] code.
    #[track_caller]
    #[inline(never)]
    pub fn invalid(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            ErrorCode::Invalid.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the [`ErrorCode::NotFound`] code.
    #[track_caller]
    #[inline(never)]
    pub fn not_found(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            ErrorCode::NotFound.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the [`ErrorCode::Unknown`] code.
    #[track_caller]
    #[inline(never)]
    pub fn unknown(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            ErrorCode::Unknown.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the [`ErrorCode::MaximumAttempts`] code.
    #[track_caller]
    #[inline(never)]
    pub fn maximum_attempts(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            ErrorCode::MaximumAttempts.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Create an error with the [`ErrorCode::Expired`] code.
    #[track_caller]
    #[inline(never)]
    pub fn expired(
        cause: Option<BoxError>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            cause,
            message.into(),
            ErrorCode::Expired.into(),
            operation.into(),
            Capture::here(1),
        )
    }

    /// Annotate `cause` with a message while propagating it.
    ///
    /// Code and operation are left empty so they resolve from the cause.
    /// Unlike the constructors above, nothing is captured.
    pub fn wrap(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
            ..Default::default()
        }
    }

    /// Wrap `cause` with no message, code, operation, or capture.
    pub fn from_cause(cause: impl Into<BoxError>) -> Self {
        Self {
            cause: Some(cause.into()),
            ..Default::default()
        }
    }

    pub(crate) fn assemble(
        cause: Option<BoxError>,
        message: String,
        code: String,
        operation: String,
        capture: Capture,
    ) -> Self {
        Self {
            code,
            message,
            operation,
            cause,
            location: capture.location,
            frames: capture.frames,
        }
    }
}

/// Wrap an optional error, passing `None` straight through.
///
/// ```
/// let none: Option<std::io::Error> = None;
/// assert!(operr::wrap(none, "reading config").is_none());
///
/// let io = std::io::Error::other("disk full");
/// let err = operr::wrap(Some(io), "reading config").unwrap();
/// assert_eq!(err.to_string(), "disk full, reading config");
/// ```
pub fn wrap<E: Into<BoxError>>(cause: Option<E>, message: impl Into<String>) -> Option<Error> {
    cause.map(|c| Error::wrap(c, message))
}

// ── Accessors ─────────────────────────────────────────────────────

impl Error {
    /// `file:line` of the constructor call, or empty for wrapped and decoded
    /// errors that carry no capture.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The captured call stack.
    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    /// Raw captured addresses. Full constructors always reserve
    /// [`FRAME_CAPACITY`](crate::FRAME_CAPACITY) slots.
    pub fn program_counters(&self) -> &[usize] {
        self.frames.program_counters()
    }

    /// Symbolised frames, stopping at the first unresolvable entry.
    pub fn runtime_frames(&self) -> impl Iterator<Item = StackFrame> + '_ {
        self.frames.resolve()
    }

    /// The wrapped cause as a plain `dyn Error`.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }

    /// Typed view of this error's own code, if it is a well-known one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.code.parse().ok()
    }

    /// HTTP response status for this error's own code.
    ///
    /// Only the outermost code is consulted; the cause chain is not walked.
    pub fn http_status_code(&self) -> u16 {
        crate::code::http_status(&self.code)
    }

    /// Emit this error as a single `tracing` event at `ERROR` level.
    pub fn report(&self) {
        let code = crate::code(Some(self));
        let message = crate::message(Some(self));
        tracing::error!(
            target: "operr",
            code = %code,
            operation = %self.operation,
            location = %self.location,
            status = self.http_status_code(),
            error = %self,
            "{message}"
        );
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Error");
        d.field("code", &self.code);
        d.field("message", &self.message);
        if !self.operation.is_empty() {
            d.field("operation", &self.operation);
        }
        if let Some(ref cause) = self.cause {
            d.field("cause", &cause.to_string());
        }
        if !self.location.is_empty() {
            d.field("location", &self.location);
        }
        d.field("frames", &self.frames);
        d.finish()
    }
}
