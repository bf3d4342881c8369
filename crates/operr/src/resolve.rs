// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolution of code and message along a cause chain, and coercion of
//! arbitrary values into structured errors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::error::Error as StdError;
use std::io;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::BoxError;
use crate::code::ErrorCode;
use crate::error::Error;
use crate::wire::{PlainError, WireError};

/// Message returned when no error in a chain carries one.
pub const DEFAULT_MESSAGE: &str = "An error has occurred.";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Fallback values used when a chain does not supply a code or message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    /// Code used by [`Error::with_default_code`] and by resolution when no
    /// error in the chain has a code.
    pub code: String,
    /// Message returned by resolution when no error in the chain has one.
    pub message: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            code: ErrorCode::Internal.into(),
            message: DEFAULT_MESSAGE.to_owned(),
        }
    }
}

impl Defaults {
    /// First non-empty code along the chain of structured errors.
    ///
    /// Returns an empty string for `None`. Walking stops at the first error
    /// that is not an [`Error`]; the default code is returned from there.
    pub fn code_of(&self, err: Option<&(dyn StdError + 'static)>) -> String {
        self.resolve(err, |s| s.code(), &self.code)
    }

    /// First non-empty message along the chain of structured errors.
    ///
    /// Same shape as [`Defaults::code_of`], with the default message as the
    /// fallback.
    pub fn message_of(&self, err: Option<&(dyn StdError + 'static)>) -> String {
        self.resolve(err, |s| s.message(), &self.message)
    }

    fn resolve<F>(&self, err: Option<&(dyn StdError + 'static)>, field: F, fallback: &str) -> String
    where
        F: Fn(&dyn Structured) -> &str,
    {
        let Some(mut current) = err else {
            return String::new();
        };
        while let Some(node) = as_structured(current) {
            let value = field(node);
            if !value.is_empty() {
                return value.to_owned();
            }
            match node.cause() {
                Some(next) => current = next,
                None => break,
            }
        }
        fallback.to_owned()
    }
}

static GLOBAL_DEFAULTS: LazyLock<RwLock<Defaults>> =
    LazyLock::new(|| RwLock::new(Defaults::default()));

/// Snapshot of the process-wide defaults.
pub fn global_defaults() -> Defaults {
    GLOBAL_DEFAULTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-wide defaults.
pub fn set_global_defaults(defaults: Defaults) {
    *GLOBAL_DEFAULTS
        .write()
        .unwrap_or_else(PoisonError::into_inner) = defaults;
}

/// Restore the process-wide defaults to `internal` / [`DEFAULT_MESSAGE`].
pub fn reset_global_defaults() {
    set_global_defaults(Defaults::default());
}

/// Resolve the code of `err` using the process-wide defaults.
///
/// ```
/// use operr::Error;
///
/// let inner = Error::not_found(None, "no row", "db.get");
/// let outer = Error::wrap(inner, "loading user");
/// assert_eq!(operr::code(Some(&outer)), "not_found");
/// assert_eq!(operr::code(None), "");
/// ```
pub fn code(err: Option<&(dyn StdError + 'static)>) -> String {
    GLOBAL_DEFAULTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .code_of(err)
}

/// Resolve the message of `err` using the process-wide defaults.
pub fn message(err: Option<&(dyn StdError + 'static)>) -> String {
    GLOBAL_DEFAULTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .message_of(err)
}

// ---------------------------------------------------------------------------
// Structured capability
// ---------------------------------------------------------------------------

/// Accessors that resolution relies on.
pub trait Structured {
    /// The error's own code, possibly empty.
    fn code(&self) -> &str;
    /// The error's own message, possibly empty.
    fn message(&self) -> &str;
    /// The next link in the chain.
    fn cause(&self) -> Option<&(dyn StdError + 'static)>;
}

impl Structured for Error {
    fn code(&self) -> &str {
        &self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn cause(&self) -> Option<&(dyn StdError + 'static)> {
        Error::cause(self)
    }
}

fn as_structured<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a dyn Structured> {
    as_error(err).map(|e| e as &dyn Structured)
}

/// Downcast a `dyn Error` to a structured [`Error`].
pub fn as_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Error> {
    err.downcast_ref::<Error>()
}

/// Iterate over `err` and every error reachable through `source()`.
pub fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Coerce an arbitrary value into a structured [`Error`].
///
/// - an [`Error`] (or boxed [`Error`]) is returned unchanged;
/// - a boxed error, an [`io::Error`], a [`PlainError`] or a [`WireError`]
///   becomes the bare cause of a new error;
/// - a `String` or `&'static str` becomes the message of a bare cause;
/// - anything else yields `None`.
///
/// Panic payloads from [`std::panic::catch_unwind`] have exactly this type.
///
/// `Any` cannot be queried for the `Error` trait, so other concrete error
/// types are only recognised once boxed as a [`BoxError`](crate::BoxError).
///
/// ```
/// let err = operr::to_error(Box::new("boom")).unwrap();
/// assert_eq!(err.to_string(), "boom");
/// assert!(operr::to_error(Box::new(42_i32)).is_none());
/// ```
pub fn to_error(value: Box<dyn Any + Send>) -> Option<Error> {
    let value = match value.downcast::<Error>() {
        Ok(err) => return Some(*err),
        Err(other) => other,
    };
    let value = match value.downcast::<Box<Error>>() {
        Ok(err) => return Some(**err),
        Err(other) => other,
    };
    let value = match value.downcast::<BoxError>() {
        Ok(err) => {
            let err: BoxError = *err;
            return Some(match err.downcast::<Error>() {
                Ok(structured) => *structured,
                Err(other) => Error::from_cause(other),
            });
        }
        Err(other) => other,
    };
    let value = match value.downcast::<io::Error>() {
        Ok(err) => return Some(Error::from_cause(*err)),
        Err(other) => other,
    };
    let value = match value.downcast::<PlainError>() {
        Ok(err) => return Some(Error::from_cause(*err)),
        Err(other) => other,
    };
    let value = match value.downcast::<WireError>() {
        Ok(err) => return Some(Error::from_cause(*err)),
        Err(other) => other,
    };
    let value = match value.downcast::<String>() {
        Ok(text) => return Some(Error::from_cause(*text)),
        Err(other) => other,
    };
    match value.downcast::<&'static str>() {
        Ok(text) => Some(Error::from_cause(*text)),
        Err(_) => None,
    }
}
