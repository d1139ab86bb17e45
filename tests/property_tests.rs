//! Property-based tests for the Monolith payload format
//!
//! Uses proptest to verify invariants across large input spaces.

use proptest::prelude::*;

use monolith_payload::{
    DEFAULT_KEY, FOOTER_SIZE, Footer, FormatError, KeySource, MAGIC, PayloadError, PayloadKey,
    apply_keystream, open_image, seal,
};

fn key_strategy() -> impl Strategy<Value = PayloadKey> {
    any::<[u8; 16]>().prop_map(PayloadKey::new)
}

// ============================================================================
// Round-trip Properties
// ============================================================================

mod roundtrip_properties {
    use super::*;

    proptest! {
        /// Keystream application is its own inverse for every length, including 0
        #[test]
        fn keystream_self_inverse(
            data in prop::collection::vec(any::<u8>(), 0..2048),
            key in key_strategy(),
            nonce in any::<[u8; 16]>(),
        ) {
            let mut buf = data.clone();
            apply_keystream(&key, &nonce, &mut buf);
            apply_keystream(&key, &nonce, &mut buf);
            prop_assert_eq!(buf, data);
        }

        /// Sealed payloads open to the original plaintext
        #[test]
        fn seal_open_roundtrip(
            host in prop::collection::vec(any::<u8>(), 0..128),
            plaintext in prop::collection::vec(any::<u8>(), 1..2048),
            key in key_strategy(),
            nonce in any::<[u8; 16]>(),
        ) {
            let mut image = host;
            image.extend(seal(&plaintext, &key, nonce).unwrap());

            prop_assert_eq!(open_image(&image, &key).unwrap(), plaintext);
        }

        /// Ciphertext has the plaintext's length and no padding
        #[test]
        fn ciphertext_length_preserved(
            plaintext in prop::collection::vec(any::<u8>(), 1..512),
            nonce in any::<[u8; 16]>(),
        ) {
            let sealed = seal(&plaintext, &PayloadKey::builtin(), nonce).unwrap();
            prop_assert_eq!(sealed.len(), plaintext.len() + FOOTER_SIZE);

            let footer = Footer::from_image(&sealed).unwrap();
            prop_assert_eq!(footer.payload_size(), plaintext.len() as u64);
        }
    }
}

// ============================================================================
// Tamper Detection Properties
// ============================================================================

mod tamper_properties {
    use super::*;

    /// Offsets of the nonce and tag inside the footer
    const NONCE_AND_TAG: std::ops::Range<usize> = 8..40;

    proptest! {
        /// A single flipped bit in ciphertext, nonce or tag fails authentication
        #[test]
        fn single_bit_flip_fails_authentication(
            plaintext in prop::collection::vec(any::<u8>(), 1..256),
            key in key_strategy(),
            nonce in any::<[u8; 16]>(),
            position in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut sealed = seal(&plaintext, &key, nonce).unwrap();
            let footer_start = sealed.len() - FOOTER_SIZE;

            // Ciphertext bytes followed by the nonce and tag bytes of the footer
            let candidates: Vec<usize> = (0..footer_start)
                .chain(NONCE_AND_TAG.map(|i| footer_start + i))
                .collect();
            let target = candidates[position.index(candidates.len())];
            sealed[target] ^= 1 << bit;

            prop_assert!(matches!(
                open_image(&sealed, &key),
                Err(PayloadError::Authentication)
            ));
        }

        /// No single-bit flip anywhere in the trailer yields a plaintext
        #[test]
        fn trailer_bit_flip_never_opens(
            plaintext in prop::collection::vec(any::<u8>(), 1..64),
            position in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let key = PayloadKey::builtin();
            let mut sealed = seal(&plaintext, &key, [9u8; 16]).unwrap();
            let target = position.index(sealed.len());
            sealed[target] ^= 1 << bit;

            prop_assert!(open_image(&sealed, &key).is_err());
        }

        /// A different key never opens the payload
        #[test]
        fn wrong_key_fails(
            plaintext in prop::collection::vec(any::<u8>(), 1..256),
            key in key_strategy(),
            other in key_strategy(),
        ) {
            prop_assume!(key.as_bytes() != other.as_bytes());
            let sealed = seal(&plaintext, &key, [1u8; 16]).unwrap();

            prop_assert!(matches!(
                open_image(&sealed, &other),
                Err(PayloadError::Authentication)
            ));
        }
    }
}

// ============================================================================
// Footer Rejection Properties
// ============================================================================

mod footer_properties {
    use super::*;

    proptest! {
        /// Images shorter than a footer are rejected as too short
        #[test]
        fn short_images_rejected(image in prop::collection::vec(any::<u8>(), 0..FOOTER_SIZE)) {
            let len = image.len() as u64;
            prop_assert_eq!(
                Footer::from_image(&image),
                Err(FormatError::TooShort { expected: FOOTER_SIZE as u64, actual: len })
            );
        }

        /// Any corruption of the magic is rejected before length checks
        #[test]
        fn corrupted_magic_rejected(
            plaintext in prop::collection::vec(any::<u8>(), 1..64),
            position in 0usize..8,
            flip in 1u8..=255,
        ) {
            let mut sealed = seal(&plaintext, &PayloadKey::builtin(), [0u8; 16]).unwrap();
            let magic_at = sealed.len() - 8 + position;
            sealed[magic_at] ^= flip;

            prop_assert!(matches!(
                open_image(&sealed, &PayloadKey::builtin()),
                Err(PayloadError::Format(FormatError::BadMagic))
            ));
        }

        /// Declared sizes of zero or beyond the available bytes are rejected
        #[test]
        fn invalid_declared_size_rejected(
            available in 0usize..256,
            excess in 1u64..u64::MAX / 2,
            zero in any::<bool>(),
        ) {
            let declared = if zero { 0 } else { available as u64 + excess };
            let footer = Footer::new(declared, [0u8; 16], [0u8; 16]);

            let mut image = vec![0u8; available];
            image.extend_from_slice(&footer.to_bytes());

            prop_assert_eq!(
                Footer::from_image(&image),
                Err(FormatError::InvalidPayloadSize {
                    declared,
                    available: available as u64,
                })
            );
        }

        /// Random footers with the right magic never panic the parser
        #[test]
        fn parse_never_panics(
            body in prop::collection::vec(any::<u8>(), 40),
            image_len in any::<u64>(),
        ) {
            let mut bytes = [0u8; FOOTER_SIZE];
            bytes[..40].copy_from_slice(&body);
            bytes[40..].copy_from_slice(&MAGIC);

            let _ = Footer::parse(&bytes, image_len);
        }
    }
}

// ============================================================================
// Key Resolution Properties
// ============================================================================

mod key_properties {
    use super::*;

    proptest! {
        /// Any 32-digit hex string, in any case, is used as the key
        #[test]
        fn valid_hex_overrides(bytes in any::<[u8; 16]>(), upper in any::<bool>()) {
            let mut value = hex::encode(bytes);
            if upper {
                value = value.to_uppercase();
            }

            let (key, source) = PayloadKey::resolve_from(Some(value.as_str()));
            prop_assert_eq!(source, KeySource::Environment);
            prop_assert_eq!(key.as_bytes(), &bytes);
        }

        /// Anything that is not exactly 32 hex digits falls back silently
        #[test]
        fn invalid_values_fall_back(value in "\\PC{0,40}") {
            prop_assume!(!(value.len() == 32 && value.chars().all(|c| c.is_ascii_hexdigit())));

            let (key, source) = PayloadKey::resolve_from(Some(value.as_str()));
            prop_assert_eq!(source, KeySource::BuiltIn);
            prop_assert_eq!(key.as_bytes(), &DEFAULT_KEY);
        }

        /// Wrong-length hex strings fall back
        #[test]
        fn wrong_length_hex_falls_back(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
            prop_assume!(bytes.len() != 16);

            let (key, source) = PayloadKey::resolve_from(Some(hex::encode(&bytes).as_str()));
            prop_assert_eq!(source, KeySource::BuiltIn);
            prop_assert!(key.is_builtin());
        }
    }
}
