//! # Encrypt/Decrypt Demo
//!
//! Bob and Alice each derive the same shared secret from their own secret
//! key and the other's public key. Bob seals a UTF-8 message under a fresh
//! nonce and hands nonce and ciphertext to the "transport" as JSON; Alice
//! opens it with her independently derived secret.
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=parley_core=debug cargo run --example encrypt_decrypt
//! ```

use parley_core::{Party, SealedMessage, SessionConfig};
use tracing_subscriber::EnvFilter;

const MESSAGE: &str = "Hello Alice , this is Bob! ;'[]{} bla bla";

fn main() -> parley_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley_core=debug,info".into()),
        )
        .init();

    println!("=== Parley Core: End-to-End Encryption Demo ===\n");

    // Step 1: Both parties generate key pairs
    println!("Step 1: Creating key pairs for Bob and Alice...");
    let mut bob = Party::new("bob", SessionConfig::default());
    let mut alice = Party::new("alice", SessionConfig::default());

    let bob_public = bob.generate_key_pair()?;
    let alice_public = alice.generate_key_pair()?;
    println!("  Bob's public key:   {}", bob_public);
    println!("  Alice's public key: {}", alice_public);
    println!();

    // Step 2: Each side derives the shared secret from the other's public key
    println!("Step 2: Deriving the shared secret (X25519 + HKDF-SHA256)...");
    bob.establish(&alice_public)?;
    alice.establish(&bob_public)?;
    println!("  Bob:   {}", bob.state());
    println!("  Alice: {}", alice.state());
    println!();

    // Step 3: Bob seals the message; the nonce travels in the clear
    println!("Step 3: Bob encrypts his message (XChaCha20-Poly1305)...");
    println!("  Plaintext: {:?}", MESSAGE);
    let wire = bob.seal_text(MESSAGE)?.to_json()?;
    println!("  On the wire: {}", wire);
    println!();

    // Step 4: Alice opens it
    println!("Step 4: Alice decrypts the message...");
    let sealed = SealedMessage::from_json(&wire)?;
    let recovered = alice.open_text(&sealed)?;
    println!("  Decrypted: {:?}", recovered);
    println!("  Matches original: {}", recovered == MESSAGE);
    println!();

    // Step 5: A tampered copy is rejected
    println!("Step 5: Tampering with the ciphertext...");
    let mut tampered = sealed;
    if let Some(byte) = tampered.ciphertext.first_mut() {
        *byte ^= 0x01;
    }
    match alice.open(&tampered) {
        Ok(_) => println!("  Unexpectedly accepted!"),
        Err(e) => println!("  Rejected: {} (Alice is now {})", e, alice.state()),
    }
    println!();

    println!("=== Demo Complete ===");
    Ok(())
}
