//! Fuzz target for key override parsing
//!
//! Any value either yields the key it spells or the built-in key.

#![no_main]

use libfuzzer_sys::fuzz_target;
use monolith_payload::{KeySource, PayloadKey};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (key, source) = PayloadKey::resolve_from(Some(s));
        match source {
            KeySource::BuiltIn => assert!(key.is_builtin()),
            KeySource::Environment => assert_eq!(s.len(), 32),
        }
    }
});
