//! # Error Handling
//!
//! This module provides the error type shared by every Parley Core operation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Randomness Errors                                                 │
//! │  │   └── RandomnessUnavailable - OS entropy source failed (fatal)      │
//! │  │                                                                      │
//! │  ├── Key Errors                                                        │
//! │  │   ├── InvalidPublicKey      - Low-order / degenerate peer key       │
//! │  │   ├── InvalidLength         - Fixed-length input has wrong size     │
//! │  │   └── KeyDerivationFailed   - HKDF expansion failed                 │
//! │  │                                                                      │
//! │  ├── Cipher Errors                                                     │
//! │  │   ├── EncryptionFailed      - Plaintext beyond cipher limit         │
//! │  │   ├── AuthenticationFailed  - Tag mismatch (no further detail)      │
//! │  │   └── MessageTooLarge       - Configured plaintext cap exceeded     │
//! │  │                                                                      │
//! │  ├── Codec Errors                                                      │
//! │  │   ├── MalformedEncoding     - Invalid base64                        │
//! │  │   ├── InvalidTextEncoding   - Invalid UTF-8                         │
//! │  │   └── Serialization         - JSON envelope error                   │
//! │  │                                                                      │
//! │  └── Workflow Errors                                                   │
//! │      └── InvalidState          - Operation not allowed in this state   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Error messages never carry key, secret, nonce or plaintext material.
//! `AuthenticationFailed` in particular does not say whether the key, the
//! nonce or the ciphertext was wrong.

use thiserror::Error;

/// Result type alias for Parley Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Parley Core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Randomness Errors (100-199)
    // ========================================================================

    /// The secure random source could not supply bytes
    #[error("Secure randomness is unavailable")]
    RandomnessUnavailable,

    // ========================================================================
    // Key Errors (200-299)
    // ========================================================================

    /// The peer's public key is not usable for key agreement
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// A fixed-length input had the wrong length
    #[error("Invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// What was being parsed ("public key", "nonce", ...)
        what: &'static str,
        /// Required length in bytes
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Key derivation failed
    #[error("Failed to derive key: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Cipher Errors (300-399)
    // ========================================================================

    /// The plaintext exceeds what the cipher can process in one message
    #[error("Encryption failed: plaintext exceeds the cipher's message limit")]
    EncryptionFailed,

    /// Ciphertext did not authenticate under the given secret and nonce
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// The plaintext exceeds the configured cap
    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge {
        /// Size of the rejected plaintext
        size: usize,
        /// Configured maximum
        max: usize,
    },

    // ========================================================================
    // Codec Errors (400-499)
    // ========================================================================

    /// A printable string is not valid base64
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// A byte sequence is not valid UTF-8 text
    #[error("Invalid text encoding: {0}")]
    InvalidTextEncoding(String),

    /// A sealed message envelope could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ========================================================================
    // Workflow Errors (500-599)
    // ========================================================================

    /// A session operation was invoked in a state that does not allow it
    #[error("Cannot {operation} while in state {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the party was in
        state: &'static str,
    },
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Randomness
    /// - 200-299: Keys
    /// - 300-399: Cipher
    /// - 400-499: Codec
    /// - 500-599: Workflow
    pub fn code(&self) -> i32 {
        match self {
            Error::RandomnessUnavailable => 100,

            Error::InvalidPublicKey(_) => 200,
            Error::InvalidLength { .. } => 201,
            Error::KeyDerivationFailed(_) => 202,

            Error::EncryptionFailed => 300,
            Error::AuthenticationFailed => 301,
            Error::MessageTooLarge { .. } => 302,

            Error::MalformedEncoding(_) => 400,
            Error::InvalidTextEncoding(_) => 401,
            Error::Serialization(_) => 402,

            Error::InvalidState { .. } => 500,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors concern a single caller-supplied input; the caller
    /// may discard that input and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AuthenticationFailed
                | Error::InvalidPublicKey(_)
                | Error::InvalidLength { .. }
                | Error::MessageTooLarge { .. }
                | Error::MalformedEncoding(_)
                | Error::InvalidTextEncoding(_)
                | Error::Serialization(_)
        )
    }

    /// Check if this error must abort the operation with no fallback
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RandomnessUnavailable)
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidTextEncoding(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    // Keep only positions: the offending symbol may belong to an encoded secret.
    fn from(err: base64::DecodeError) -> Self {
        use base64::DecodeError;

        let reason = match err {
            DecodeError::InvalidByte(offset, _) => {
                format!("invalid character at offset {}", offset)
            }
            DecodeError::InvalidLastSymbol(offset, _) => {
                format!("non-canonical final symbol at offset {}", offset)
            }
            DecodeError::InvalidPadding => "incorrect padding".to_string(),
            _ => "invalid input length".to_string(),
        };
        Error::MalformedEncoding(reason)
    }
}

// ============================================================================
// TESTS
// ============================================================================
