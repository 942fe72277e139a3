//! # Key Management
//!
//! This module handles X25519 key pair generation and the printable forms of
//! public and secret keys.
//!
//! ## Key Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY TYPES                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  KeyPair (X25519)                                                      │
//! │  ────────────────                                                       │
//! │                                                                         │
//! │  ┌───────────────┐   scalar × basepoint   ┌───────────────┐            │
//! │  │  SecretKey    │ ─────────────────────► │  PublicKey    │            │
//! │  │  32 bytes     │                        │  32 bytes     │            │
//! │  │               │                        │               │            │
//! │  │ • never logged│                        │ • shared      │            │
//! │  │ • zeroized    │                        │   freely      │            │
//! │  │   on drop     │                        │ • base64 in   │            │
//! │  │               │                        │   serde       │            │
//! │  └───────────────┘                        └───────────────┘            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{ZeroizeOnDrop, Zeroizing};

use super::random::random_array_with;
use super::{PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
use crate::codec::{check_len, decode_printable_array, encode_printable};
use crate::error::Result;

/// An X25519 key pair owned by one party
///
/// ## Security
///
/// - The secret key is zeroized when this struct is dropped
/// - The public key can be safely shared with anyone
/// - Neither `Clone` nor `Serialize` is implemented
#[derive(ZeroizeOnDrop)]
pub struct KeyPair {
    /// Private half (secret)
    secret: SecretKey,
    /// Public half, derived from the secret
    #[zeroize(skip)]
    public: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    ///
    /// Uses the operating system's secure random number generator.
    pub fn generate() -> Result<Self> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a new key pair from the given generator
    pub fn generate_with<R>(rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let bytes = Zeroizing::new(random_array_with::<_, SECRET_KEY_SIZE>(rng)?);
        Ok(Self::from_secret_bytes(&bytes))
    }

    /// Rebuild a key pair from raw secret key bytes
    ///
    /// The public key is recomputed by base-point multiplication, so the
    /// same secret always yields the same public key.
    pub fn from_secret_bytes(bytes: &[u8; SECRET_KEY_SIZE]) -> Self {
        let secret = SecretKey::from_bytes(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Get the public key for sharing with the peer
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Get the secret key
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &self.secret)
            .finish()
    }
}

/// X25519 secret key
#[derive(ZeroizeOnDrop)]
pub struct SecretKey {
    #[zeroize(skip)] // x25519_dalek handles its own zeroization
    inner: StaticSecret,
}

impl SecretKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_SIZE]) -> Self {
        Self {
            inner: StaticSecret::from(*bytes),
        }
    }

    /// Create from a slice, checking the length
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut array = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        array.copy_from_slice(check_len(bytes, SECRET_KEY_SIZE, "secret key")?);
        Ok(Self::from_bytes(&array))
    }

    /// Decode from the printable (base64) form
    pub fn from_printable(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(decode_printable_array::<SECRET_KEY_SIZE>(
            encoded,
            "secret key",
        )?);
        Ok(Self::from_bytes(&bytes))
    }

    /// Get the secret key bytes (for backup/storage)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit these bytes.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_SIZE]> {
        Zeroizing::new(self.inner.to_bytes())
    }

    /// Encode as base64, wiped from memory when the returned value drops
    pub fn to_printable(&self) -> Zeroizing<String> {
        Zeroizing::new(encode_printable(&self.to_bytes()[..]))
    }

    /// Compute the matching public key (scalar × basepoint)
    pub fn public_key(&self) -> PublicKey {
        PublicKey(X25519PublicKey::from(&self.inner).to_bytes())
    }

    /// Perform the raw X25519 scalar multiplication with a peer key
    pub(crate) fn diffie_hellman(&self, their_public: &PublicKey) -> x25519_dalek::SharedSecret {
        self.inner
            .diffie_hellman(&X25519PublicKey::from(their_public.0))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// X25519 public key that can be safely shared with others
///
/// Serializes as a base64 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "printable_bytes")] [u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut array = [0u8; PUBLIC_KEY_SIZE];
        array.copy_from_slice(check_len(bytes, PUBLIC_KEY_SIZE, "public key")?);
        Ok(Self(array))
    }

    /// Decode from the printable (base64) form
    pub fn from_printable(encoded: &str) -> Result<Self> {
        decode_printable_array::<PUBLIC_KEY_SIZE>(encoded, "public key").map(Self)
    }

    /// Encode as base64 (for display, QR codes, transport)
    pub fn to_printable(&self) -> String {
        encode_printable(&self.0)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Copy out the raw bytes
    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_printable())
    }
}

/// Serde helper for serializing byte arrays as base64
mod printable_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::codec::{decode_printable_array, encode_printable};
    use crate::crypto::PUBLIC_KEY_SIZE;

    pub fn serialize<S>(bytes: &[u8; PUBLIC_KEY_SIZE], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode_printable(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; PUBLIC_KEY_SIZE], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_printable_array::<PUBLIC_KEY_SIZE>(&s, "public key").map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_keypair_generation() {
        let kp1 = KeyPair::generate().unwrap();
        let kp2 = KeyPair::generate().unwrap();

        assert_ne!(kp1.public_key(), kp2.public_key());
        assert_ne!(*kp1.secret_key().to_bytes(), *kp2.secret_key().to_bytes());
    }

    #[test]
    fn test_public_key_reproducible_from_secret() {
        let kp = KeyPair::generate().unwrap();
        let rebuilt = KeyPair::from_secret_bytes(&kp.secret_key().to_bytes());

        assert_eq!(kp.public_key(), rebuilt.public_key());
        assert_eq!(kp.public_key(), kp.secret_key().public_key());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let kp1 = KeyPair::generate_with(&mut StdRng::seed_from_u64(42)).unwrap();
        let kp2 = KeyPair::generate_with(&mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn test_rfc7748_public_key_vector() {
        // Alice's key pair from RFC 7748 section 6.1
        let secret: [u8; 32] = [
            0x77, 0x07, 0x6d, 0x0a, 0x73, 0x18, 0xa5, 0x7d, 0x3c, 0x16, 0xc1, 0x72, 0x51, 0xb2,
            0x66, 0x45, 0xdf, 0x4c, 0x2f, 0x87, 0xeb, 0xc0, 0x99, 0x2a, 0xb1, 0x77, 0xfb, 0xa5,
            0x1d, 0xb9, 0x2c, 0x2a,
        ];
        let public: [u8; 32] = [
            0x85, 0x20, 0xf0, 0x09, 0x89, 0x30, 0xa7, 0x54, 0x74, 0x8b, 0x7d, 0xdc, 0xb4, 0x3e,
            0xf7, 0x5a, 0x0d, 0xbf, 0x3a, 0x0d, 0x26, 0x38, 0x1a, 0xf4, 0xeb, 0xa4, 0xa9, 0x8e,
            0xaa, 0x9b, 0x4e, 0x6a,
        ];

        let kp = KeyPair::from_secret_bytes(&secret);
        assert_eq!(kp.public_key().to_bytes(), public);
    }

    #[test]
    fn test_public_key_printable_round_trip() {
        let kp = KeyPair::generate().unwrap();
        let encoded = kp.public_key().to_printable();

        assert_eq!(encoded.len(), 44);
        assert_eq!(PublicKey::from_printable(&encoded).unwrap(), kp.public_key());
    }

    #[test]
    fn test_secret_key_printable_round_trip() {
        let kp = KeyPair::generate().unwrap();
        let encoded = kp.secret_key().to_printable();
        let restored = SecretKey::from_printable(&encoded).unwrap();

        assert_eq!(restored.public_key(), kp.public_key());
    }

    #[test]
    fn test_public_key_serialization() {
        let kp = KeyPair::generate().unwrap();
        let public = kp.public_key();

        let json = serde_json::to_string(&public).unwrap();
        assert_eq!(json, format!("\"{}\"", public.to_printable()));

        let restored: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(public, restored);
    }

    #[test]
    fn test_public_key_wrong_length_rejected() {
        let err = PublicKey::from_slice(&[0u8; 31]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidLength {
                what: "public key",
                expected: 32,
                actual: 31
            }
        );

        let short = encode_printable(&[1u8; 16]);
        assert!(matches!(
            PublicKey::from_printable(&short),
            Err(Error::InvalidLength { actual: 16, .. })
        ));
    }

    #[test]
    fn test_secret_key_wrong_length_rejected() {
        assert!(matches!(
            SecretKey::from_slice(&[0u8; 33]),
            Err(Error::InvalidLength { what: "secret key", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let kp = KeyPair::generate_with(&mut StdRng::seed_from_u64(1)).unwrap();
        let secret_b64 = kp.secret_key().to_printable();
        let debug = format!("{:?}", kp);

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(secret_b64.as_str()));
    }
}
