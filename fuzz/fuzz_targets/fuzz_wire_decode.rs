// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz wire decoding and the storage adapter.
//!
//! Verifies:
//! 1. Decoding arbitrary bytes never panics.
//! 2. A decoded error re-encodes to a record that decodes to the same record.
//! 3. A failed scan leaves the target untouched.
#![no_main]
use libfuzzer_sys::fuzz_target;
use operr::{Error, StoredValue};

fuzz_target!(|data: &[u8]| {
    // --- Property 1 & 2: decode, then re-encode ---
    if let Ok(err) = Error::from_wire(data) {
        let record = err.to_record();
        let wire = err.to_wire().expect("decoded error must encode");
        let back = Error::from_wire(&wire).expect("re-encoded error must decode");
        assert_eq!(back.to_record(), record);
        assert_eq!(back.to_string(), err.to_string());
        let _ = operr::code(Some(&back));
        let _ = operr::message(Some(&back));
    }

    // --- Property 3: scan keeps target on failure ---
    let mut target = Error::invalid(None, "keep", "fuzz.scan");
    let value = match std::str::from_utf8(data) {
        Ok(s) => StoredValue::Text(s.to_owned()),
        Err(_) => StoredValue::Bytes(data.to_vec()),
    };
    if target.scan(&value).is_err() {
        assert_eq!(target.message, "keep");
        assert_eq!(target.code, "invalid");
    }
});
