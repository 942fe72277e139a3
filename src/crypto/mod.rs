//! # Cryptography Module
//!
//! This module provides all cryptographic primitives used by Parley Core.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────┐                      ┌──────────────────┐        │
//! │  │  Bob's KeyPair   │                      │ Alice's KeyPair  │        │
//! │  │  (X25519)        │                      │ (X25519)         │        │
//! │  └────────┬─────────┘                      └────────┬─────────┘        │
//! │           │        public keys exchanged            │                  │
//! │           │◄───────────── out of band ─────────────►│                  │
//! │           ▼                                         ▼                  │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  1. Key Exchange: X25519 ECDH                                  │   │
//! │  │     Bob's Secret × Alice's Public = Alice's Secret × Bob's Public│  │
//! │  │                                                                 │   │
//! │  │  2. Key Derivation: HKDF-SHA256                                │   │
//! │  │     DH output → SharedSecret (32 bytes)                        │   │
//! │  │                                                                 │   │
//! │  │  3. Encryption: XChaCha20-Poly1305                             │   │
//! │  │     • 256-bit key                                              │   │
//! │  │     • 192-bit nonce (random per message)                       │   │
//! │  │     • 128-bit authentication tag                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices & Rationale
//!
//! | Algorithm | Purpose | Why Chosen |
//! |-----------|---------|------------|
//! | X25519 | Key Exchange | Fast ECDH, constant-time dalek implementation |
//! | HKDF-SHA256 | Key Derivation | Industry standard, well-analyzed |
//! | XChaCha20-Poly1305 | Encryption | AEAD with nonces large enough to pick at random |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: Secret keys and shared secrets are zeroized when dropped
//! 2. **Secure Random**: `rand::rngs::OsRng` unless the caller injects a generator
//! 3. **No Nonce Reuse**: Callers must never encrypt twice under one (secret, nonce)
//! 4. **No Forward Secrecy**: A leaked secret key exposes every message to or from it

mod encryption;
mod kdf;
mod keys;
mod random;

pub use encryption::{decrypt, encrypt, encrypt_with_random_nonce, Nonce, SharedSecret};
pub use kdf::{
    derive_shared_secret, derive_shared_secret_from_slices, derive_shared_secret_with_domain,
    domain,
};
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use random::{fill_random, fill_random_with, random_bytes, random_bytes_with};

/// Size of X25519 public keys in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of X25519 secret keys in bytes
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of the derived shared secret in bytes (256 bits)
pub const SHARED_SECRET_SIZE: usize = 32;

/// Size of XChaCha20-Poly1305 nonces in bytes (192 bits)
pub const NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag appended to every ciphertext
pub const TAG_SIZE: usize = 16;

/// Generate a fresh X25519 key pair from the OS random source
///
/// Equivalent to [`KeyPair::generate`].
pub fn generate_key_pair() -> crate::Result<KeyPair> {
    KeyPair::generate()
}
