//! # Parley Core
//!
//! Authenticated, confidential point-to-point messaging between two parties.
//! Each party generates an X25519 key pair, both derive the same shared
//! secret from the other's public key, and messages are sealed with
//! XChaCha20-Poly1305 under a fresh public nonce.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PARLEY CORE MODULES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │                          Session                                  │ │
//! │  │  - Party state machine  - SealedMessage  - SessionConfig          │ │
//! │  └──────────────┬───────────────────────────────────┬────────────────┘ │
//! │                 │                                   │                  │
//! │  ┌──────────────▼──────────────┐     ┌──────────────▼────────────────┐ │
//! │  │           Crypto            │     │            Codec              │ │
//! │  │                             │     │                               │ │
//! │  │ - Random source             │     │ - Printable (base64)          │ │
//! │  │ - X25519 + HKDF-SHA256      │────►│ - Text (UTF-8)                │ │
//! │  │ - XChaCha20-Poly1305        │     │                               │ │
//! │  └─────────────────────────────┘     └───────────────────────────────┘ │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type for the entire library
//! - [`crypto`] - Key agreement, nonces, authenticated encryption
//! - [`codec`] - Printable and text encodings
//! - [`session`] - Per-party workflow and the sealed message value
//!
//! ## Quick Start
//!
//! ```
//! use parley_core::crypto::{decrypt, derive_shared_secret, encrypt, generate_key_pair, Nonce};
//!
//! let bob = generate_key_pair()?;
//! let alice = generate_key_pair()?;
//!
//! let bob_shared = derive_shared_secret(bob.secret_key(), &alice.public_key())?;
//! let alice_shared = derive_shared_secret(alice.secret_key(), &bob.public_key())?;
//!
//! let nonce = Nonce::generate()?;
//! let ciphertext = encrypt(b"Hello Alice", &nonce, &bob_shared)?;
//! assert_eq!(decrypt(&ciphertext, &nonce, &alice_shared)?, b"Hello Alice");
//! # Ok::<(), parley_core::Error>(())
//! ```
//!
//! Transport, key storage and identity binding of public keys are left to
//! the caller. There is no forward secrecy.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod codec;
pub mod crypto;
pub mod error;
pub mod session;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use crypto::{KeyPair, Nonce, PublicKey, SecretKey, SharedSecret};
pub use error::{Error, Result};
pub use session::{Party, PartyState, SealedMessage, SessionConfig};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Parley Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
