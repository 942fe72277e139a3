//! # Session Workflow
//!
//! One party's side of a two-party exchange, composed from the crypto and
//! codec layers.
//!
//! ## State Machine
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         PARTY STATE MACHINE                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Uninitialized                                                         │
//! │       │ generate_key_pair()                                            │
//! │       ▼                                                                │
//! │  HasKeyPair ──── public key handed to the peer out of band             │
//! │       │ establish(peer_public)        secret key dropped here          │
//! │       ▼                                                                │
//! │  HasSharedSecret                                                       │
//! │       │                                                                │
//! │       ├── seal(plaintext) ──────► ReadyToSend ◄──┐ seal(...)           │
//! │       │                                └─────────┘                     │
//! │       │                                                                │
//! │       └── open(sealed) ─┬───────► MessageRecovered ◄──┐ open(...)      │
//! │                         │                    └────────┘                │
//! │                         └─ tag mismatch ──► Failed (terminal)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing moves backwards. A party that needs to talk to a different peer
//! starts over with a new [`Party`]. Operations attempted in the wrong state
//! return [`Error::InvalidState`] and leave the party untouched.
//!
//! ## Example
//!
//! ```
//! use parley_core::session::{Party, SessionConfig};
//!
//! let mut bob = Party::new("bob", SessionConfig::default());
//! let mut alice = Party::new("alice", SessionConfig::default());
//!
//! let bob_public = bob.generate_key_pair()?;
//! let alice_public = alice.generate_key_pair()?;
//! bob.establish(&alice_public)?;
//! alice.establish(&bob_public)?;
//!
//! let sealed = bob.seal_text("Hello Alice")?;
//! assert_eq!(alice.open_text(&sealed)?, "Hello Alice");
//! # Ok::<(), parley_core::Error>(())
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::codec::{decode_printable, decode_text, encode_printable, encode_text};
use crate::crypto::{
    decrypt, derive_shared_secret_with_domain, domain, encrypt, KeyPair, Nonce, PublicKey,
    SharedSecret, NONCE_SIZE,
};
use crate::error::{Error, Result};

// ============================================================================
// STATE
// ============================================================================

/// Where a party is in its workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyState {
    /// No key material yet
    Uninitialized,
    /// Key pair generated, waiting for the peer's public key
    HasKeyPair,
    /// Shared secret derived, ready to seal or open
    HasSharedSecret,
    /// At least one message sealed
    ReadyToSend,
    /// At least one message opened
    MessageRecovered,
    /// A message failed authentication; the party is unusable
    Failed,
}

impl PartyState {
    /// Stable name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyState::Uninitialized => "Uninitialized",
            PartyState::HasKeyPair => "HasKeyPair",
            PartyState::HasSharedSecret => "HasSharedSecret",
            PartyState::ReadyToSend => "ReadyToSend",
            PartyState::MessageRecovered => "MessageRecovered",
            PartyState::Failed => "Failed",
        }
    }
}

impl fmt::Display for PartyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Settings shared by both sides of a session
///
/// Both parties must use the same `kdf_domain` or they will derive different
/// secrets and every message will fail authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// HKDF info label for shared-secret derivation
    pub kdf_domain: Vec<u8>,
    /// Largest plaintext `seal` accepts (no cap if None)
    pub max_plaintext_size: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            kdf_domain: domain::SHARED_SECRET.to_vec(),
            max_plaintext_size: None,
        }
    }
}

impl SessionConfig {
    /// Use a different HKDF domain label
    pub fn with_kdf_domain(mut self, label: impl Into<Vec<u8>>) -> Self {
        self.kdf_domain = label.into();
        self
    }

    /// Reject plaintexts longer than `max` bytes
    pub fn with_max_plaintext_size(mut self, max: usize) -> Self {
        self.max_plaintext_size = Some(max);
        self
    }
}

// ============================================================================
// TRANSPORT VALUE
// ============================================================================

/// The nonce and ciphertext a sender hands to its transport
///
/// The nonce is not secret and travels in the clear next to the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// Nonce the message was sealed under
    pub nonce: Nonce,
    /// Ciphertext with the authentication tag appended
    pub ciphertext: Vec<u8>,
}

/// Printable form of a [`SealedMessage`] (both fields base64)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedMessage {
    /// Nonce (base64 encoded)
    pub nonce: String,
    /// Ciphertext with tag (base64 encoded)
    pub ciphertext: String,
}

impl EncodedMessage {
    /// Decode both fields back into a [`SealedMessage`]
    pub fn decode(&self) -> Result<SealedMessage> {
        Ok(SealedMessage {
            nonce: Nonce::from_printable(&self.nonce)?,
            ciphertext: decode_printable(&self.ciphertext)?,
        })
    }
}

impl SealedMessage {
    /// Encode both fields as base64
    pub fn to_encoded(&self) -> EncodedMessage {
        EncodedMessage {
            nonce: self.nonce.to_printable(),
            ciphertext: encode_printable(&self.ciphertext),
        }
    }

    /// Serialize to JSON (`{"nonce": "...", "ciphertext": "..."}`)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_encoded())?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let encoded: EncodedMessage = serde_json::from_str(json)?;
        encoded.decode()
    }

    /// Combined byte form: `nonce (24 bytes) || ciphertext`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(self.nonce.as_bytes());
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split the combined byte form
    ///
    /// Only the nonce prefix is checked here; a short or damaged ciphertext
    /// is caught when the message is opened.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < NONCE_SIZE {
            return Err(Error::InvalidLength {
                what: "sealed message",
                expected: NONCE_SIZE,
                actual: bytes.len(),
            });
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        Ok(Self {
            nonce: Nonce::from_slice(nonce)?,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

// ============================================================================
// PARTY
// ============================================================================

/// Key material a party holds at each stage
enum Material {
    None,
    KeyPair(KeyPair),
    Shared(SharedSecret),
}

/// One side of a two-party session
pub struct Party {
    name: String,
    config: SessionConfig,
    state: PartyState,
    public: Option<PublicKey>,
    material: Material,
}

impl Party {
    /// Create a party with no key material
    ///
    /// `name` only appears in log output.
    pub fn new(name: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: PartyState::Uninitialized,
            public: None,
            material: Material::None,
        }
    }

    /// Current workflow state
    pub fn state(&self) -> PartyState {
        self.state
    }

    /// Name given at creation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session settings
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Our public key, once generated
    pub fn public_key(&self) -> Option<PublicKey> {
        self.public
    }

    /// Generate our key pair and return the public half for the peer
    pub fn generate_key_pair(&mut self) -> Result<PublicKey> {
        self.generate_key_pair_with(&mut OsRng)
    }

    /// Generate our key pair from the given generator
    pub fn generate_key_pair_with<R>(&mut self, rng: &mut R) -> Result<PublicKey>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        self.require("generate a key pair", &[PartyState::Uninitialized])?;

        let key_pair = KeyPair::generate_with(rng)?;
        let public = key_pair.public_key();
        self.public = Some(public);
        self.material = Material::KeyPair(key_pair);
        self.transition(PartyState::HasKeyPair);

        Ok(public)
    }

    /// Derive the shared secret with the peer's public key
    ///
    /// Our secret key is wiped once the shared secret exists. A rejected
    /// peer key leaves the party in `HasKeyPair`.
    pub fn establish(&mut self, peer_public: &PublicKey) -> Result<()> {
        self.require("establish a shared secret", &[PartyState::HasKeyPair])?;

        let shared = match &self.material {
            Material::KeyPair(key_pair) => derive_shared_secret_with_domain(
                key_pair.secret_key(),
                peer_public,
                &self.config.kdf_domain,
            )?,
            _ => return Err(self.invalid("establish a shared secret")),
        };

        // Dropping the old material zeroizes the secret key
        self.material = Material::Shared(shared);
        self.transition(PartyState::HasSharedSecret);
        Ok(())
    }

    /// Encrypt under a fresh random nonce
    pub fn seal(&mut self, plaintext: &[u8]) -> Result<SealedMessage> {
        self.seal_with(&mut OsRng, plaintext)
    }

    /// Encrypt a UTF-8 string
    pub fn seal_text(&mut self, text: &str) -> Result<SealedMessage> {
        self.seal(&decode_text(text))
    }

    /// Encrypt with a nonce drawn from the given generator
    pub fn seal_with<R>(&mut self, rng: &mut R, plaintext: &[u8]) -> Result<SealedMessage>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        const OPERATION: &str = "seal a message";
        self.require(OPERATION, &[PartyState::HasSharedSecret, PartyState::ReadyToSend])?;

        if let Some(max) = self.config.max_plaintext_size {
            if plaintext.len() > max {
                return Err(Error::MessageTooLarge {
                    size: plaintext.len(),
                    max,
                });
            }
        }

        let shared = self.shared_secret(OPERATION)?;
        let nonce = Nonce::generate_with(rng)?;
        let ciphertext = encrypt(plaintext, &nonce, shared)?;

        tracing::debug!(
            party = %self.name,
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "Sealed message"
        );
        self.transition(PartyState::ReadyToSend);

        Ok(SealedMessage { nonce, ciphertext })
    }

    /// Authenticate and decrypt a message from the peer
    ///
    /// On authentication failure the shared secret is wiped and the party
    /// moves to `Failed` for good.
    pub fn open(&mut self, sealed: &SealedMessage) -> Result<Vec<u8>> {
        const OPERATION: &str = "open a message";
        self.require(OPERATION, &[PartyState::HasSharedSecret, PartyState::MessageRecovered])?;

        let shared = self.shared_secret(OPERATION)?;
        match decrypt(&sealed.ciphertext, &sealed.nonce, shared) {
            Ok(plaintext) => {
                tracing::debug!(
                    party = %self.name,
                    plaintext_len = plaintext.len(),
                    "Opened message"
                );
                self.transition(PartyState::MessageRecovered);
                Ok(plaintext)
            }
            Err(e) => {
                tracing::warn!(party = %self.name, "Message failed authentication");
                self.material = Material::None;
                self.transition(PartyState::Failed);
                Err(e)
            }
        }
    }

    /// Open a message and interpret it as UTF-8
    ///
    /// A message that authenticates but is not valid UTF-8 still counts as
    /// recovered; only the conversion fails.
    pub fn open_text(&mut self, sealed: &SealedMessage) -> Result<String> {
        let plaintext = self.open(sealed)?;
        encode_text(&plaintext)
    }

    fn shared_secret(&self, operation: &'static str) -> Result<&SharedSecret> {
        match &self.material {
            Material::Shared(shared) => Ok(shared),
            _ => Err(self.invalid(operation)),
        }
    }

    fn require(&self, operation: &'static str, allowed: &[PartyState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    fn transition(&mut self, next: PartyState) {
        if self.state != next {
            tracing::debug!(party = %self.name, from = %self.state, to = %next, "State transition");
            self.state = next;
        }
    }
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Party")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================
