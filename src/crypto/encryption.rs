//! # Encryption Module
//!
//! Provides XChaCha20-Poly1305 encryption for message confidentiality and
//! integrity.
//!
//! ## Encryption Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      MESSAGE ENCRYPTION FLOW                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SENDER (Bob)                                                          │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  XChaCha20-Poly1305-Encrypt(                                 │       │
//! │  │    key       = shared_secret,                               │       │
//! │  │    nonce     = random 24 bytes,                             │       │
//! │  │    plaintext = message                                      │       │
//! │  │  )                                                          │       │
//! │  │           ↓                                                  │       │
//! │  │  ciphertext || tag (len = plaintext + 16)                   │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Bob sends (nonce, ciphertext). The nonce travels in the clear.        │
//! │                                                                         │
//! │  RECIPIENT (Alice)                                                     │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  XChaCha20-Poly1305-Decrypt(                                 │       │
//! │  │    key        = shared_secret [SAME as Bob derived],        │       │
//! │  │    nonce      = received_nonce,                             │       │
//! │  │    ciphertext = received_ciphertext                         │       │
//! │  │  )                                                          │       │
//! │  │           ↓                                                  │       │
//! │  │  Plaintext (or AuthenticationFailed, nothing released)      │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//!
//! | Property | Guarantee |
//! |----------|-----------|
//! | Confidentiality | Only holders of the shared secret can read the message |
//! | Integrity | Any modification of ciphertext or nonce is detected |
//! | No partial output | The tag is verified before any plaintext is produced |
//! | Forward Secrecy | Not provided |

use std::fmt;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::random::random_array_with;
use super::{NONCE_SIZE, SHARED_SECRET_SIZE, TAG_SIZE};
use crate::codec::{check_len, decode_printable_array, encode_printable};
use crate::error::{Error, Result};

/// A nonce (number used once) for XChaCha20-Poly1305
///
/// ## Critical Security Requirement
///
/// **NEVER reuse a nonce with the same shared secret!**
///
/// Two messages under the same (secret, nonce) share a keystream: XORing the
/// ciphertexts reveals the XOR of the plaintexts, and the Poly1305 key is
/// exposed, allowing forgeries.
///
/// Nonces are 192 bits, so random generation is safe for effectively
/// unlimited messages per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Generate a cryptographically random nonce
    pub fn generate() -> Result<Self> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a nonce from the given generator
    pub fn generate_with<R>(rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        random_array_with(rng).map(Self)
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut array = [0u8; NONCE_SIZE];
        array.copy_from_slice(check_len(bytes, NONCE_SIZE, "nonce")?);
        Ok(Self(array))
    }

    /// Decode from the printable (base64) form
    pub fn from_printable(encoded: &str) -> Result<Self> {
        decode_printable_array::<NONCE_SIZE>(encoded, "nonce").map(Self)
    }

    /// Encode as base64
    pub fn to_printable(&self) -> String {
        encode_printable(&self.0)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

impl TryFrom<String> for Nonce {
    type Error = Error;

    fn try_from(encoded: String) -> Result<Self> {
        Self::from_printable(&encoded)
    }
}

impl From<Nonce> for String {
    fn from(nonce: Nonce) -> Self {
        nonce.to_printable()
    }
}

/// The symmetric key two parties share after key agreement
///
/// Zeroized when dropped. `Debug` output is redacted and there is no
/// `PartialEq`; compare through [`SharedSecret::as_bytes`] when needed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl SharedSecret {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Create from a slice, checking the length
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut array = [0u8; SHARED_SECRET_SIZE];
        array.copy_from_slice(check_len(bytes, SHARED_SECRET_SIZE, "shared secret")?);
        Ok(Self { bytes: array })
    }

    /// Get the raw bytes
    ///
    /// ## Security Warning
    ///
    /// Treat these like a private key. Never log or transmit them.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.bytes
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.bytes))
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Encrypt a message using XChaCha20-Poly1305
///
/// ## Parameters
///
/// - `plaintext`: Message to encrypt (any length)
/// - `nonce`: Fresh 24-byte nonce, never reused with this secret
/// - `secret`: 32-byte shared secret
///
/// ## Returns
///
/// `plaintext.len() + TAG_SIZE` bytes of ciphertext with the tag appended.
///
/// ## Errors
///
/// `EncryptionFailed` only if the plaintext exceeds the cipher's
/// per-message limit (about 256 GiB).
pub fn encrypt(plaintext: &[u8], nonce: &Nonce, secret: &SharedSecret) -> Result<Vec<u8>> {
    let ciphertext = secret
        .cipher()
        .encrypt(XNonce::from_slice(&nonce.0), plaintext)
        .map_err(|_| Error::EncryptionFailed)?;

    debug_assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);
    Ok(ciphertext)
}

/// Encrypt under a freshly generated nonce
///
/// ## Returns
///
/// Tuple of (nonce, ciphertext_with_tag)
///
/// ## Example
///
/// ```
/// use parley_core::crypto::{decrypt, encrypt_with_random_nonce, SharedSecret};
///
/// let secret = SharedSecret::from_bytes([42u8; 32]);
/// let (nonce, ciphertext) = encrypt_with_random_nonce(b"Hello, Alice!", &secret)?;
/// assert_eq!(decrypt(&ciphertext, &nonce, &secret)?, b"Hello, Alice!");
/// # Ok::<(), parley_core::Error>(())
/// ```
pub fn encrypt_with_random_nonce(plaintext: &[u8], secret: &SharedSecret) -> Result<(Nonce, Vec<u8>)> {
    let nonce = Nonce::generate()?;
    let ciphertext = encrypt(plaintext, &nonce, secret)?;
    Ok((nonce, ciphertext))
}

/// Decrypt a message using XChaCha20-Poly1305
///
/// ## Parameters
///
/// - `ciphertext`: Ciphertext with authentication tag
/// - `nonce`: Nonce used during encryption
/// - `secret`: Shared secret (must be the one used for encryption)
///
/// ## Errors
///
/// Returns `AuthenticationFailed` if:
/// - The ciphertext was tampered with or truncated
/// - The shared secret is wrong
/// - The nonce is wrong
///
/// The error is identical in every case.
pub fn decrypt(ciphertext: &[u8], nonce: &Nonce, secret: &SharedSecret) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_SIZE {
        return Err(Error::AuthenticationFailed);
    }

    secret
        .cipher()
        .decrypt(XNonce::from_slice(&nonce.0), ciphertext)
        .map_err(|_| Error::AuthenticationFailed)
}

// ============================================================================
// TESTS
// ============================================================================
