// SPDX-License-Identifier: MIT OR Apache-2.0
//! Context annotation on `Result`s.

use crate::BoxError;
use crate::capture::Capture;
use crate::error::Error;

/// Extension trait for turning any error into an [`Error`] during
/// propagation.
///
/// ```
/// use operr::ResultExt;
///
/// fn read_config() -> Result<String, operr::Error> {
///     std::fs::read_to_string("/definitely/missing.toml").op_err(
///         "not_found",
///         "config file missing",
///         "config.load",
///     )
/// }
///
/// let err = read_config().unwrap_err();
/// assert_eq!(err.code, "not_found");
/// assert_eq!(err.operation, "config.load");
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with a message. Nothing is captured.
    fn wrap_err(self, message: impl Into<String>) -> Result<T, Error>;

    /// Build a full [`Error`] around the error, capturing the caller.
    #[track_caller]
    fn op_err(
        self,
        code: impl Into<String>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn wrap_err(self, message: impl Into<String>) -> Result<T, Error> {
        self.map_err(|e| Error::wrap(e, message))
    }

    #[track_caller]
    #[inline(never)]
    fn op_err(
        self,
        code: impl Into<String>,
        message: impl Into<String>,
        operation: impl Into<String>,
    ) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(Error::assemble(
                Some(e.into()),
                message.into(),
                code.into(),
                operation.into(),
                Capture::here(1),
            )),
        }
    }
}
