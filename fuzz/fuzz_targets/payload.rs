//! Fuzz target for sealing and opening
//!
//! Anything sealed must open to the same bytes, and a single flipped byte
//! must never open.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use monolith_payload::{PayloadKey, open_image, seal};

#[derive(Debug, Arbitrary)]
struct PayloadInput {
    key: [u8; 16],
    nonce: [u8; 16],
    plaintext: Vec<u8>,
    flip_at: usize,
    flip_mask: u8,
}

fuzz_target!(|input: PayloadInput| {
    let key = PayloadKey::new(input.key);

    let Ok(mut sealed) = seal(&input.plaintext, &key, input.nonce) else {
        assert!(input.plaintext.is_empty());
        return;
    };
    assert_eq!(open_image(&sealed, &key).ok(), Some(input.plaintext.clone()));

    if input.flip_mask != 0 {
        let at = input.flip_at % sealed.len();
        sealed[at] ^= input.flip_mask;
        assert!(open_image(&sealed, &key).is_err());
    }
});
