//! # Random Source
//!
//! Secure random bytes for key generation and nonces.
//!
//! The default source is `rand::rngs::OsRng`, which is stateless on our
//! side and safe to draw from on many threads at once. Every function has a
//! `_with` variant taking an explicit `RngCore + CryptoRng` so callers (and
//! tests) can inject their own generator.
//!
//! Draws are fallible: an OS entropy failure surfaces as
//! [`Error::RandomnessUnavailable`] instead of a panic.

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};

use crate::error::{Error, Result};

/// Fill `buf` from the operating system's secure random source
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    fill_random_with(&mut OsRng, buf)
}

/// Fill `buf` from the given cryptographically secure generator
pub fn fill_random_with<R>(rng: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: RngCore + CryptoRng + ?Sized,
{
    rng.try_fill_bytes(buf).map_err(|e| {
        tracing::error!("Random source failed: {}", e);
        Error::RandomnessUnavailable
    })
}

/// Return `n` bytes from the operating system's secure random source
pub fn random_bytes(n: usize) -> Result<Vec<u8>> {
    random_bytes_with(&mut OsRng, n)
}

/// Return `n` bytes from the given cryptographically secure generator
pub fn random_bytes_with<R>(rng: &mut R, n: usize) -> Result<Vec<u8>>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = vec![0u8; n];
    fill_random_with(rng, &mut bytes)?;
    Ok(bytes)
}

/// Fixed-size variant used for keys and nonces
pub(crate) fn random_array_with<R, const N: usize>(rng: &mut R) -> Result<[u8; N]>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = [0u8; N];
    fill_random_with(rng, &mut bytes)?;
    Ok(bytes)
}

// ============================================================================
// TESTS
// ============================================================================
