// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz ErrorCode parsing and the HTTP status mapping.
//!
//! Verifies:
//! 1. Parsing and deserializing arbitrary strings never panics.
//! 2. Parse and serde agree on the closed set.
//! 3. Every string maps to a known HTTP status.
#![no_main]
use libfuzzer_sys::fuzz_target;
use operr::ErrorCode;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = s.parse::<ErrorCode>();
    let quoted = serde_json::to_string(s).expect("strings always serialize");
    let deserialized = serde_json::from_str::<ErrorCode>(&quoted);
    assert_eq!(parsed.is_ok(), deserialized.is_ok());
    if let (Ok(a), Ok(b)) = (&parsed, &deserialized) {
        assert_eq!(a, b);
        assert_eq!(a.as_str(), s);
    }

    let status = operr::http_status(s);
    assert!(matches!(status, 400 | 402 | 404 | 409 | 429 | 500));
    if parsed.is_err() {
        assert_eq!(status, 500);
    }
});
