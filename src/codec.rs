//! # Codec Layer
//!
//! Pure, stateless transforms between bytes and their external string forms:
//!
//! | Transform | Direction | Format | Failure |
//! |-----------|-----------|--------|---------|
//! | [`encode_printable`] | bytes → string | base64, standard alphabet, `=` padding | never |
//! | [`decode_printable`] | string → bytes | same | `MalformedEncoding` |
//! | [`encode_text`] | bytes → string | UTF-8 | `InvalidTextEncoding` |
//! | [`decode_text`] | string → bytes | UTF-8 | never |
//!
//! Keys, nonces and ciphertext use the printable pair; human-readable
//! message bodies use the text pair. A Rust `&str` is UTF-8 by construction,
//! so turning text into bytes cannot fail and the validation happens when
//! untrusted bytes are turned back into text.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Encode bytes as standard padded base64
pub fn encode_printable(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard padded base64
///
/// Rejects characters outside the alphabet, missing or surplus padding, and
/// non-canonical trailing bits. Nothing is partially decoded.
pub fn decode_printable(encoded: &str) -> Result<Vec<u8>> {
    Ok(BASE64.decode(encoded)?)
}

/// Decode base64 that must yield exactly `N` bytes
///
/// The intermediate buffer is wiped, since this is also used for secret keys.
pub fn decode_printable_array<const N: usize>(encoded: &str, what: &'static str) -> Result<[u8; N]> {
    let bytes = Zeroizing::new(decode_printable(encoded)?);
    let mut array = [0u8; N];
    array.copy_from_slice(check_len(&bytes, N, what)?);
    Ok(array)
}

/// Interpret bytes as UTF-8 text
pub fn encode_text(bytes: &[u8]) -> Result<String> {
    Ok(std::str::from_utf8(bytes)?.to_owned())
}

/// Take the UTF-8 bytes of a string
pub fn decode_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Require `bytes` to be exactly `expected` long
pub(crate) fn check_len<'a>(bytes: &'a [u8], expected: usize, what: &'static str) -> Result<&'a [u8]> {
    if bytes.len() != expected {
        return Err(Error::InvalidLength {
            what,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

// ============================================================================
// TESTS
// ============================================================================
