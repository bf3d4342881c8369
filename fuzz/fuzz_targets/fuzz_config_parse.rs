// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz config parsing and validation.
#![no_main]
use libfuzzer_sys::fuzz_target;
use operr_config::{parse_toml, validate_config};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = parse_toml(s) {
        let _ = validate_config(&cfg);
        let defaults = cfg.to_defaults();
        assert!(!defaults.message.is_empty() || cfg.default_message.as_deref() == Some(""));
    }
});
