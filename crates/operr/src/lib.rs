// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured application errors.
//!
//! An [`Error`] carries a machine-readable code, a human-readable message,
//! the logical operation in progress, an optional wrapped cause, and the
//! call site and call stack captured when it was built. Errors are meant to
//! be wrapped as they propagate: the outermost error usually knows *where*
//! things went wrong, while the innermost one knows *what* went wrong.
//! [`code`] and [`message`] resolve the first non-empty value along that
//! chain.
//!
//! ```
//! use operr::{Error, ErrorCode};
//!
//! let inner = Error::not_found(None, "no such order", "orders.get");
//! let outer = Error::wrap(inner, "loading checkout");
//!
//! assert_eq!(operr::code(Some(&outer)), "not_found");
//! assert_eq!(operr::message(Some(&outer)), "loading checkout");
//! assert_eq!(ErrorCode::NotFound.http_status(), 404);
//! ```
//!
//! Errors can also be flattened to a five-field JSON record for transport
//! or storage, see [`ErrorRecord`] and [`StoredValue`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod capture;
mod code;
mod error;
mod ext;
mod format;
mod macros;
mod resolve;
mod storage;
mod wire;

pub use capture::{FRAME_CAPACITY, Frames, StackFrame};
pub use code::{ErrorCode, UnknownCode, http_status};
pub use error::{Error, wrap};
pub use ext::ResultExt;
pub use resolve::{
    DEFAULT_MESSAGE, Defaults, Structured, as_error, chain, code, global_defaults, message,
    reset_global_defaults, set_global_defaults, to_error,
};
pub use storage::StoredValue;
pub use wire::{ErrorRecord, PlainError, WireError};

/// Boxed, thread-safe error used as the cause of an [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `Result` with [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
