// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flat wire representation of an [`Error`] for storage and transport.
//!
//! The record has exactly five string fields:
//!
//! ```json
//! {"code":"…","message":"…","operation":"…","error":"…","file_line":"…"}
//! ```
//!
//! `error` holds the rendered cause, or `""` when there is none. The cause's
//! structure is not preserved: decoding rebuilds it as a single
//! [`PlainError`] carrying that string.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::BoxError;
use crate::error::Error;

/// Serialisable snapshot of an [`Error`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ErrorRecord {
    /// Error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Operation label.
    pub operation: String,
    /// Rendered cause, empty when there is none.
    pub error: String,
    /// Captured `file:line`, empty when nothing was captured.
    pub file_line: String,
}

impl From<&Error> for ErrorRecord {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code.clone(),
            message: err.message.clone(),
            operation: err.operation.clone(),
            error: err
                .cause
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_default(),
            file_line: err.location().to_owned(),
        }
    }
}

impl From<ErrorRecord> for Error {
    fn from(record: ErrorRecord) -> Self {
        Self {
            code: record.code,
            message: record.message,
            operation: record.operation,
            cause: if record.error.is_empty() {
                None
            } else {
                Some(Box::new(PlainError(record.error)) as BoxError)
            },
            location: record.file_line,
            ..Default::default()
        }
    }
}

/// A cause rebuilt from its rendered string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainError(pub String);

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PlainError {}

/// Failures of the wire and storage conversions.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The record could not be serialised.
    #[error("failed to encode error record: {0}")]
    Encode(#[source] serde_json::Error),

    /// The input is not a well-formed error record.
    #[error("failed to decode error record: {0}")]
    Decode(#[source] serde_json::Error),

    /// A stored value of a type that cannot hold an error record.
    #[error("unsupported stored value type: {kind}")]
    UnsupportedType {
        /// Name of the rejected value type.
        kind: &'static str,
    },
}

impl Error {
    /// Flat record for this error.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::from(self)
    }

    /// Encode as JSON bytes.
    pub fn to_wire(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(&self.to_record()).map_err(WireError::Encode)
    }

    /// Decode from JSON bytes into a new error.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, WireError> {
        let record: ErrorRecord = serde_json::from_slice(bytes).map_err(|e| {
            tracing::debug!(target: "operr.wire", error = %e, "rejected error record");
            WireError::Decode(e)
        })?;
        Ok(record.into())
    }

    /// Decode from JSON bytes into `self`.
    ///
    /// On failure `self` is left exactly as it was.
    pub fn decode_into(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        *self = Self::from_wire(bytes)?;
        Ok(())
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Error {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ErrorRecord::deserialize(deserializer).map(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn record_without_cause_has_empty_error() {
        let err = Error::invalid(None, "bad", "op");
        let record = err.to_record();
        assert_eq!(record.code, "invalid");
        assert_eq!(record.message, "bad");
        assert_eq!(record.operation, "op");
        assert_eq!(record.error, "");
        assert_eq!(record.file_line, err.location());
        assert!(!record.file_line.is_empty());
    }

    #[test]
    fn record_with_cause_renders_it() {
        let err = Error::conflict(Some(io::Error::other("taken").into()), "dup", "op");
        assert_eq!(err.to_record().error, "taken");
    }

    #[test]
    fn json_has_all_five_keys() {
        let json: serde_json::Value =
            serde_json::from_slice(&Error::default().to_wire().unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["code", "error", "file_line", "message", "operation"]);
        assert!(obj.values().all(|v| v == ""));
    }

    #[test]
    fn decode_rebuilds_one_level_cause() {
        let inner = Error::not_found(None, "row", "db");
        let rendered = inner.to_string();
        let err = Error::wrap(inner, "loading");
        let back = Error::from_wire(&err.to_wire().unwrap()).unwrap();
        assert_eq!(back.message, "loading");
        let cause = back.cause().unwrap();
        assert_eq!(cause.to_string(), rendered);
        assert!(cause.downcast_ref::<PlainError>().is_some());
        assert!(cause.source().is_none());
    }

    #[test]
    fn decode_without_cause_has_none() {
        let wire = br#"{"code":"expired","message":"m","operation":"o","error":"","file_line":""}"#;
        let back = Error::from_wire(wire).unwrap();
        assert_eq!(back.code, "expired");
        assert!(back.cause.is_none());
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let back = Error::from_wire(br#"{"message":"only"}"#).unwrap();
        assert_eq!(back.message, "only");
        assert!(back.code.is_empty());
        assert!(back.location().is_empty());
    }

    #[test]
    fn malformed_input_is_rejected() {
        let cases: [&[u8]; 5] = [b"not json", br#""text""#, b"42", br#"{"code": 7}"#, b""];
        for bad in cases {
            let err = Error::from_wire(bad).unwrap_err();
            assert!(matches!(err, WireError::Decode(_)), "{bad:?}");
        }
    }

    #[test]
    fn decode_into_leaves_target_on_failure() {
        let mut target = Error::invalid(None, "keep", "op");
        assert!(target.decode_into(b"{oops").is_err());
        assert_eq!(target.message, "keep");
        assert_eq!(target.code, "invalid");

        target.decode_into(br#"{"code":"conflict"}"#).unwrap();
        assert_eq!(target.code, "conflict");
        assert!(target.message.is_empty());
    }

    #[test]
    fn serde_impls_go_through_record() {
        let err = Error::expired(Some("lapsed".into()), "renew", "billing");
        let json = serde_json::to_string(&err).unwrap();
        let back: Error = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), err.to_string());
    }

    #[test]
    fn plain_error_displays_verbatim() {
        assert_eq!(PlainError("x: y".into()).to_string(), "x: y");
    }
}
