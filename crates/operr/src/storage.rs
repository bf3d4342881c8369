// SPDX-License-Identifier: MIT OR Apache-2.0
//! Adapter for storing an [`Error`] in an opaque database column.
//!
//! Mirrors the usual driver pattern: [`Error::value`] exports the wire bytes,
//! [`Error::scan`] imports them back. Only null, byte and text inputs are
//! accepted on the way in.

use crate::error::Error;
use crate::wire::WireError;

/// A column value as handed over by a storage driver.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// SQL `NULL` or an absent value.
    Null,
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

impl StoredValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
        }
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<String> for StoredValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for StoredValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl<T: Into<StoredValue>> From<Option<T>> for StoredValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Error {
    /// Export for storage. Always produces bytes, even for an empty error.
    pub fn value(&self) -> Result<StoredValue, WireError> {
        self.to_wire().map(StoredValue::Bytes)
    }

    /// Import from storage into `self`.
    ///
    /// `Null` is a successful no-op. Bytes and text are decoded as a wire
    /// record; any other variant is rejected with
    /// [`WireError::UnsupportedType`].
    pub fn scan(&mut self, src: &StoredValue) -> Result<(), WireError> {
        match src {
            StoredValue::Null => Ok(()),
            StoredValue::Bytes(bytes) => self.decode_into(bytes),
            StoredValue::Text(text) => self.decode_into(text.as_bytes()),
            other => {
                tracing::warn!(
                    target: "operr.storage",
                    kind = other.kind(),
                    "cannot scan error from stored value"
                );
                Err(WireError::UnsupportedType { kind: other.kind() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_always_bytes() {
        let value = Error::default().value().unwrap();
        let StoredValue::Bytes(bytes) = value else {
            panic!("expected bytes, got {value:?}");
        };
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "");
    }

    #[test]
    fn scan_null_is_noop() {
        let mut err = Error::invalid(None, "kept", "op");
        err.scan(&StoredValue::Null).unwrap();
        assert_eq!(err.message, "kept");
        assert_eq!(err.code, "invalid");
    }

    #[test]
    fn scan_bytes_and_text() {
        let src = Error::conflict(Some("dup key".into()), "exists", "users.insert");
        let stored = src.value().unwrap();

        let mut from_bytes = Error::default();
        from_bytes.scan(&stored).unwrap();
        assert_eq!(from_bytes.code, "conflict");
        assert_eq!(from_bytes.cause().unwrap().to_string(), "dup key");

        let StoredValue::Bytes(bytes) = stored else {
            unreachable!()
        };
        let text = String::from_utf8(bytes).unwrap();
        let mut from_text = Error::default();
        from_text.scan(&StoredValue::from(text)).unwrap();
        assert_eq!(from_text.operation, "users.insert");
        assert_eq!(from_text.message, "exists");
    }

    #[test]
    fn scan_rejects_other_types() {
        let mut err = Error::default();
        for value in [
            StoredValue::Int(1),
            StoredValue::Float(1.5),
            StoredValue::Bool(true),
        ] {
            let failure = err.scan(&value).unwrap_err();
            match failure {
                WireError::UnsupportedType { kind } => assert_eq!(kind, value.kind()),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn scan_malformed_text_fails() {
        let mut err = Error::default();
        let failure = err.scan(&StoredValue::from("{not json")).unwrap_err();
        assert!(matches!(failure, WireError::Decode(_)));
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(StoredValue::from(None::<String>), StoredValue::Null);
        assert_eq!(
            StoredValue::from(Some("x")),
            StoredValue::Text("x".into())
        );
    }
}
