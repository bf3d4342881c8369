// SPDX-License-Identifier: MIT OR Apache-2.0
//! The closed set of application error codes and their HTTP mapping.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Machine-readable, stable error code.
///
/// Each variant serialises to a `snake_case` string that is part of the wire
/// format and must not change across releases. [`Error`](crate::Error) stores
/// its code as a plain string so that codes outside this set survive a round
/// trip; this enum is the typed view over the well-known values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// An action cannot be performed in the current state.
    Conflict,
    /// Error within the application.
    Internal,
    /// Validation failed.
    Invalid,
    /// Entity does not exist.
    NotFound,
    /// Application unknown error.
    Unknown,
    /// More attempts than allowed.
    MaximumAttempts,
    /// Subscription or resource expired.
    Expired,
}

impl ErrorCode {
    /// Every code in the closed set.
    pub const ALL: [ErrorCode; 7] = [
        Self::Conflict,
        Self::Internal,
        Self::Invalid,
        Self::NotFound,
        Self::Unknown,
        Self::MaximumAttempts,
        Self::Expired,
    ];

    /// Stable `&'static str` representation (e.g. `"not_found"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::Invalid => "invalid",
            Self::NotFound => "not_found",
            Self::Unknown => "unknown",
            Self::MaximumAttempts => "maximum_attempts",
            Self::Expired => "expired",
        }
    }

    /// HTTP response status for this code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Conflict => 409,
            Self::Invalid => 400,
            Self::NotFound => 404,
            Self::Expired => 402,
            Self::MaximumAttempts => 429,
            Self::Internal | Self::Unknown => 500,
        }
    }
}

/// HTTP response status for an arbitrary code string.
///
/// Codes outside the closed set (including the empty string) map to `500`.
pub fn http_status(code: &str) -> u16 {
    code.parse::<ErrorCode>()
        .map(|c| c.http_status())
        .unwrap_or(500)
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_owned()
    }
}

/// Returned when a string is not one of the well-known codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code '{0}'")]
pub struct UnknownCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_owned()))
    }
}
