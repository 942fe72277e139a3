//! # Key Encode/Decode Demo
//!
//! Generates a key pair and round-trips both halves through their printable
//! (base64) form, as for sharing a public key or storing a key in a file.
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=parley_core=debug cargo run --example key_encode_decode
//! ```

use parley_core::crypto::{generate_key_pair, PublicKey, SecretKey};
use tracing_subscriber::EnvFilter;

fn main() -> parley_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley_core=debug,info".into()),
        )
        .init();

    println!("=== Parley Core: Key Encode/Decode Demo ===\n");

    println!("Step 1: Generating an X25519 key pair...");
    let key_pair = generate_key_pair()?;
    println!();

    println!("Step 2: Encoding both keys as base64...");
    let encoded_public = key_pair.public_key().to_printable();
    let encoded_secret = key_pair.secret_key().to_printable();
    println!("  Public key: {}", encoded_public);
    println!("  Secret key: <{} characters, not shown>", encoded_secret.len());
    println!();

    println!("Step 3: Decoding them again...");
    let decoded_public = PublicKey::from_printable(&encoded_public)?;
    let decoded_secret = SecretKey::from_printable(&encoded_secret)?;

    let public_matches = decoded_public == key_pair.public_key();
    let secret_matches = *decoded_secret.to_bytes() == *key_pair.secret_key().to_bytes();
    println!("  Public key matches: {}", public_matches);
    println!("  Secret key matches: {}", secret_matches);
    println!(
        "  Decoded secret still yields the same public key: {}",
        decoded_secret.public_key() == key_pair.public_key()
    );
    println!();

    println!("=== Demo Complete ===");
    Ok(())
}
