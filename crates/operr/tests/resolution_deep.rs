// SPDX-License-Identifier: MIT OR Apache-2.0
//! Code and message resolution across cause chains.

use std::io;

use operr::{BoxError, DEFAULT_MESSAGE, Defaults, Error, as_error, chain, to_error};
use proptest::prelude::*;
use serial_test::serial;

// ── Helpers ─────────────────────────────────────────────────────────────

fn link(code: &str, message: &str, cause: Option<BoxError>) -> Error {
    let mut err = Error::default();
    err.code = code.into();
    err.message = message.into();
    err.cause = cause;
    err
}

/// Builds a chain from `(code, message)` pairs, outermost first, optionally
/// terminated by a plain `io::Error`.
fn build_chain(links: &[(String, String)], plain_tail: bool) -> Error {
    let mut cause: Option<BoxError> = plain_tail.then(|| io::Error::other("tail").into());
    for (code, message) in links.iter().skip(1).rev() {
        cause = Some(link(code, message, cause).into());
    }
    let (code, message) = &links[0];
    link(code, message, cause)
}

fn fast_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    }
}

fn arb_field() -> BoxedStrategy<String> {
    prop_oneof![Just(String::new()), "[a-z_]{1,12}"].boxed()
}

fn arb_links() -> BoxedStrategy<Vec<(String, String)>> {
    prop::collection::vec((arb_field(), arb_field()), 1..12).boxed()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(fast_config())]

    #[test]
    fn code_is_first_non_empty_or_default(links in arb_links(), tail in any::<bool>()) {
        let err = build_chain(&links, tail);
        let expected = links
            .iter()
            .map(|(c, _)| c.as_str())
            .find(|c| !c.is_empty())
            .unwrap_or("internal");
        prop_assert_eq!(Defaults::default().code_of(Some(&err)), expected);
    }

    #[test]
    fn message_is_first_non_empty_or_default(links in arb_links(), tail in any::<bool>()) {
        let err = build_chain(&links, tail);
        let expected = links
            .iter()
            .map(|(_, m)| m.as_str())
            .find(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MESSAGE);
        prop_assert_eq!(Defaults::default().message_of(Some(&err)), expected);
    }

    #[test]
    fn chain_length_matches_links(links in arb_links(), tail in any::<bool>()) {
        let err = build_chain(&links, tail);
        prop_assert_eq!(chain(&err).count(), links.len() + usize::from(tail));
        prop_assert_eq!(chain(&err).filter(|e| as_error(*e).is_some()).count(), links.len());
    }
}

// ── Fixed cases ─────────────────────────────────────────────────────────

#[test]
fn wrapping_keeps_inner_code_visible() {
    let root = Error::maximum_attempts(None, "gave up", "jobs.retry");
    let mid = Error::wrap(root, "");
    let top = Error::wrap(mid, "processing batch 7");
    assert_eq!(operr::code(Some(&top)), "maximum_attempts");
    assert_eq!(operr::message(Some(&top)), "processing batch 7");
}

#[test]
fn plain_error_in_middle_stops_resolution() {
    let deep = Error::not_found(None, "hidden", "db");
    let opaque: BoxError = Box::new(io::Error::other(deep.to_string()));
    let top = Error::wrap(opaque, "");
    assert_eq!(Defaults::default().code_of(Some(&top)), "internal");
}

#[test]
fn very_deep_chain_resolves_without_recursion() {
    let mut err = Error::expired(None, "root", "op");
    for _ in 0..10_000 {
        err = Error::wrap(err, "");
    }
    let d = Defaults::default();
    assert_eq!(d.code_of(Some(&err)), "expired");
    assert_eq!(d.message_of(Some(&err)), "root");
    // Drop iteratively-built chains without blowing the test thread's stack.
    let mut next = Some(err);
    while let Some(mut e) = next {
        next = e
            .cause
            .take()
            .and_then(|c| c.downcast::<Error>().ok())
            .map(|b| *b);
    }
}

#[test]
fn none_is_empty_for_both() {
    assert_eq!(operr::code(None), "");
    assert_eq!(operr::message(None), "");
}

#[test]
fn panic_payload_becomes_structured() {
    let payload = std::panic::catch_unwind(|| {
        std::panic::panic_any(Error::conflict(None, "lost race", "locks.acquire"))
    })
    .unwrap_err();
    let err = to_error(payload).unwrap();
    assert_eq!(err.code, "conflict");
    assert_eq!(operr::message(Some(&err)), "lost race");
}

#[test]
fn formatted_panic_payload_is_a_bare_cause() {
    let payload = std::panic::catch_unwind(|| panic!("index {} out of range", 9)).unwrap_err();
    let err = to_error(payload).unwrap();
    assert_eq!(err.to_string(), "index 9 out of range");
    assert_eq!(Defaults::default().code_of(Some(&err)), "internal");
}

// ── Process-wide defaults ───────────────────────────────────────────────

#[test]
#[serial(global_defaults)]
fn global_defaults_drive_free_functions() {
    operr::set_global_defaults(Defaults {
        code: "unknown".into(),
        message: "Try later.".into(),
    });
    let bare = Error::from_cause(io::Error::other("x"));
    let code = operr::code(Some(&bare));
    let message = operr::message(Some(&bare));
    let made = Error::with_default_code(None, "", "op");
    operr::reset_global_defaults();

    assert_eq!(code, "unknown");
    assert_eq!(message, "Try later.");
    assert_eq!(made.code, "unknown");
}

#[test]
#[serial(global_defaults)]
fn reset_restores_builtins() {
    operr::set_global_defaults(Defaults {
        code: "conflict".into(),
        message: "m".into(),
    });
    operr::reset_global_defaults();
    assert_eq!(operr::global_defaults(), Defaults::default());
}

#[test]
#[serial(global_defaults)]
fn defaults_survive_concurrent_readers() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                let err = Error::default();
                for _ in 0..1_000 {
                    assert_eq!(operr::code(Some(&err)), "internal");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
