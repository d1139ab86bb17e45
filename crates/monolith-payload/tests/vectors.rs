//! Known-answer vectors for the embedded payload format.
//!
//! Images produced by earlier builds must keep opening, so these values are
//! fixed: a change here means a format break, not a test update.

use monolith_payload::{
    DEFAULT_KEY, FOOTER_SIZE, Footer, MAGIC, PayloadKey, apply_keystream, compute_tag, open_image,
    seal,
};

// Helper function to decode hex strings
fn decode_hex(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

fn counting_nonce() -> [u8; 16] {
    let mut nonce = [0u8; 16];
    for (i, byte) in nonce.iter_mut().enumerate() {
        *byte = i as u8;
    }
    nonce
}

// ============================================================================
// Constants
// ============================================================================

#[test]
fn test_format_constants() {
    assert_eq!(FOOTER_SIZE, 48);
    assert_eq!(MAGIC, [0x6a, 0xc1, 0x53, 0x8f, 0x2d, 0xb7, 0x44, 0xe9]);
    assert_eq!(DEFAULT_KEY.to_vec(), decode_hex("912fd74a83bc5519e06d33fa08c472ae"));
}

// ============================================================================
// Default Key Vectors
// ============================================================================

#[test]
fn test_default_key_ciphertext_vector() {
    let key = PayloadKey::builtin();
    let mut buf = b"hello monolith".to_vec();
    apply_keystream(&key, &counting_nonce(), &mut buf);

    assert_eq!(buf, decode_hex("3fd5f8b04a0c4268da1167e98531"));
}

#[test]
fn test_default_key_tag_vector() {
    let key = PayloadKey::builtin();
    let ciphertext = decode_hex("3fd5f8b04a0c4268da1167e98531");
    let tag = compute_tag(&key, &counting_nonce(), &ciphertext);

    assert_eq!(tag.to_vec(), decode_hex("fe81107a2d842927cd58d41f02335d55"));
}

#[test]
fn test_default_key_keystream_prefix() {
    let key = PayloadKey::builtin();
    let mut zeros = [0u8; 16];
    apply_keystream(&key, &[0u8; 16], &mut zeros);

    assert_eq!(zeros.to_vec(), decode_hex("5487997f51cf7cf4cd8c6bcf15742157"));
}

#[test]
fn test_empty_ciphertext_tag_vector() {
    let tag = compute_tag(&PayloadKey::builtin(), &[0u8; 16], b"");
    assert_eq!(tag.to_vec(), decode_hex("4151bfa994a2d94de22a5c80c0341e69"));
}

// ============================================================================
// Override Key Vectors
// ============================================================================

#[test]
fn test_override_key_vector() {
    let (key, _) = PayloadKey::resolve_from(Some("000102030405060708090a0b0c0d0e0f"));
    let nonce = counting_nonce();

    let mut buf = b"hello monolith".to_vec();
    apply_keystream(&key, &nonce, &mut buf);
    assert_eq!(buf, decode_hex("e3c6218c423f9e147516208eb7d1"));

    let tag = compute_tag(&key, &nonce, &buf);
    assert_eq!(tag.to_vec(), decode_hex("3724d584cf8ede9474ce098c4fcec01f"));
}

// ============================================================================
// Full Image Vector
// ============================================================================

#[test]
fn test_sealed_image_layout() {
    let key = PayloadKey::builtin();
    let nonce = counting_nonce();
    let sealed = seal(b"hello monolith", &key, nonce).unwrap();

    let mut expected = decode_hex("3fd5f8b04a0c4268da1167e98531");
    expected.extend_from_slice(&14u64.to_le_bytes());
    expected.extend_from_slice(&nonce);
    expected.extend_from_slice(&decode_hex("fe81107a2d842927cd58d41f02335d55"));
    expected.extend_from_slice(&MAGIC);
    assert_eq!(sealed, expected);

    let mut image = vec![0x7f, b'E', b'L', b'F'];
    image.extend_from_slice(&sealed);

    let footer = Footer::from_image(&image).unwrap();
    assert_eq!(footer.payload_size(), 14);
    assert_eq!(footer.payload_range(image.len() as u64), 4..18);
    assert_eq!(open_image(&image, &key).unwrap(), b"hello monolith");
}
