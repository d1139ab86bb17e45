//! Fuzz target for footer parsing
//!
//! Arbitrary images must be rejected or opened, never panic. Both the
//! in-memory and the seekable reader paths are exercised.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use monolith_payload::{Footer, PayloadKey, open_image};

fuzz_target!(|data: &[u8]| {
    let _ = Footer::from_image(data);

    let mut reader = Cursor::new(data);
    if let Ok((footer, image_len)) = Footer::read_from(&mut reader) {
        assert_eq!(image_len, data.len() as u64);
        let range = footer.payload_range(image_len);
        assert!(range.start <= range.end && range.end <= image_len);
        let _ = footer.read_ciphertext(&mut reader, image_len);
    }

    let _ = open_image(data, &PayloadKey::builtin());
});
