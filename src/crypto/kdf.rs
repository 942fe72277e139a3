//! # Key Agreement & Derivation
//!
//! Turns one party's secret key and the other party's public key into the
//! symmetric [`SharedSecret`] used by the cipher.
//!
//! ## Shared Secret Derivation
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SHARED SECRET DERIVATION                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Own SecretKey ──┐                                                     │
//! │                  ├──► X25519 ──► DH output (32 bytes)                  │
//! │  Peer PublicKey ─┘                  │                                  │
//! │                                     │  reject if all-zero              │
//! │                                     │  (low-order peer point)          │
//! │                                     ▼                                  │
//! │                     HKDF-SHA256(                                       │
//! │                       ikm  = DH output,                               │
//! │                       salt = none,                                    │
//! │                       info = domain label                             │
//! │                     )                                                  │
//! │                                     │                                  │
//! │                                     ▼                                  │
//! │                     SharedSecret (32 bytes)                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because X25519 is commutative, `derive(a.secret, b.public)` and
//! `derive(b.secret, a.public)` produce identical secrets provided both
//! sides use the same domain label.
//!
//! | Aspect | Design Choice |
//! |--------|---------------|
//! | Curve | X25519 (RFC 7748) |
//! | KDF Algorithm | HKDF-SHA256 |
//! | Key Separation | `info` domain label |
//! | Version String | "-v1" suffix |

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::encryption::SharedSecret;
use super::keys::{PublicKey, SecretKey};
use super::SHARED_SECRET_SIZE;
use crate::error::{Error, Result};

/// Domain separation strings for HKDF
pub mod domain {
    /// Default domain label for shared secret derivation
    pub const SHARED_SECRET: &[u8] = b"parley-shared-secret-v1";
}

/// Derive the shared secret between our secret key and a peer's public key
///
/// Uses the default domain label. Fails with `InvalidPublicKey` when the
/// peer's key is a low-order point, which would make the result independent
/// of our secret.
pub fn derive_shared_secret(own_secret: &SecretKey, peer_public: &PublicKey) -> Result<SharedSecret> {
    derive_shared_secret_with_domain(own_secret, peer_public, domain::SHARED_SECRET)
}

/// Derive the shared secret using a caller-chosen domain label
///
/// Both parties must use the same label to arrive at the same secret.
pub fn derive_shared_secret_with_domain(
    own_secret: &SecretKey,
    peer_public: &PublicKey,
    domain: &[u8],
) -> Result<SharedSecret> {
    let dh_output = own_secret.diffie_hellman(peer_public);

    if !dh_output.was_contributory() {
        tracing::warn!("Rejected non-contributory peer public key");
        return Err(Error::InvalidPublicKey(
            "low-order point yields a degenerate shared secret".into(),
        ));
    }

    let hkdf = Hkdf::<Sha256>::new(None, dh_output.as_bytes());
    let mut key = Zeroizing::new([0u8; SHARED_SECRET_SIZE]);
    hkdf.expand(domain, &mut key[..])
        .map_err(|_| Error::KeyDerivationFailed("HKDF expansion failed".into()))?;

    Ok(SharedSecret::from_bytes(*key))
}

/// Derive the shared secret from raw key bytes
///
/// Both inputs must be exactly 32 bytes; lengths are checked before any
/// curve arithmetic happens.
pub fn derive_shared_secret_from_slices(own_secret: &[u8], peer_public: &[u8]) -> Result<SharedSecret> {
    let own_secret = SecretKey::from_slice(own_secret)?;
    let peer_public = PublicKey::from_slice(peer_public)?;
    derive_shared_secret(&own_secret, &peer_public)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn test_shared_secret_symmetry() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();

        let alice_shared = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();
        let bob_shared = derive_shared_secret(bob.secret_key(), &alice.public_key()).unwrap();

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let alice = KeyPair::from_secret_bytes(&[1u8; 32]);
        let bob = KeyPair::from_secret_bytes(&[2u8; 32]);

        let first = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();
        let second = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();

        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_secret_is_hashed_not_raw_dh() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();

        let raw = alice.secret_key().diffie_hellman(&bob.public_key());
        let derived = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();

        assert_ne!(raw.as_bytes(), derived.as_bytes());
    }

    #[test]
    fn test_different_peers_different_secrets() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let carol = KeyPair::generate().unwrap();

        let with_bob = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();
        let with_carol = derive_shared_secret(alice.secret_key(), &carol.public_key()).unwrap();

        assert_ne!(with_bob.as_bytes(), with_carol.as_bytes());
    }

    #[test]
    fn test_domain_separation() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();

        let default = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();
        let other =
            derive_shared_secret_with_domain(alice.secret_key(), &bob.public_key(), b"other-app-v1")
                .unwrap();

        assert_ne!(default.as_bytes(), other.as_bytes());
    }

    #[test]
    fn test_low_order_points_rejected() {
        let alice = KeyPair::generate().unwrap();

        // u = 0 and u = 1 are low-order; a clamped scalar maps both to zero
        let mut one = [0u8; 32];
        one[0] = 1;
        for point in [[0u8; 32], one] {
            let result = derive_shared_secret(alice.secret_key(), &PublicKey::from_bytes(point));
            assert!(matches!(result, Err(Error::InvalidPublicKey(_))));
        }
    }

    #[test]
    fn test_slice_lengths_validated() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let secret = alice.secret_key().to_bytes();

        let err = derive_shared_secret_from_slices(&secret[..31], bob.public_key().as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLength { what: "secret key", actual: 31, .. }));

        let err = derive_shared_secret_from_slices(&secret[..], &[9u8; 33]).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { what: "public key", actual: 33, .. }));

        let ok = derive_shared_secret_from_slices(&secret[..], bob.public_key().as_bytes()).unwrap();
        let expected = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();
        assert_eq!(ok.as_bytes(), expected.as_bytes());
    }

    #[test]
    fn test_concurrent_derivation() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let expected = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let shared =
                        derive_shared_secret(bob.secret_key(), &alice.public_key()).unwrap();
                    assert_eq!(shared.as_bytes(), expected.as_bytes());
                });
            }
        });
    }
}
