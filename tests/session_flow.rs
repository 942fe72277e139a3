//! End-to-end exchanges between two parties.
//!
//! Run with: cargo test --test session_flow

use parley_core::codec::{decode_printable, encode_printable};
use parley_core::crypto::{decrypt, derive_shared_secret, encrypt, generate_key_pair, Nonce};
use parley_core::{Error, Party, PartyState, PublicKey, SealedMessage, SessionConfig};

fn connect(config: SessionConfig) -> (Party, Party) {
    let mut bob = Party::new("bob", config.clone());
    let mut alice = Party::new("alice", config);

    let bob_public = bob.generate_key_pair().unwrap();
    let alice_public = alice.generate_key_pair().unwrap();

    bob.establish(&alice_public).unwrap();
    alice.establish(&bob_public).unwrap();
    (bob, alice)
}

#[test]
fn bob_sends_hello_alice() {
    let (mut bob, mut alice) = connect(SessionConfig::default());

    let sealed = bob.seal_text("Hello Alice").unwrap();
    assert_eq!(sealed.ciphertext.len(), "Hello Alice".len() + 16);
    assert_eq!(bob.state(), PartyState::ReadyToSend);

    let text = alice.open_text(&sealed).unwrap();
    assert_eq!(text, "Hello Alice");
    assert_eq!(alice.state(), PartyState::MessageRecovered);
}

#[test]
fn free_functions_match_the_workflow() {
    let bob = generate_key_pair().unwrap();
    let alice = generate_key_pair().unwrap();

    let bob_shared = derive_shared_secret(bob.secret_key(), &alice.public_key()).unwrap();
    let alice_shared = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();
    assert_eq!(bob_shared.as_bytes(), alice_shared.as_bytes());

    let nonce = Nonce::generate().unwrap();
    let ciphertext = encrypt(b"Hello Alice", &nonce, &bob_shared).unwrap();
    assert_eq!(decrypt(&ciphertext, &nonce, &alice_shared).unwrap(), b"Hello Alice");
}

#[test]
fn alice_using_her_own_nonce_fails() {
    let bob = generate_key_pair().unwrap();
    let alice = generate_key_pair().unwrap();
    let bob_shared = derive_shared_secret(bob.secret_key(), &alice.public_key()).unwrap();
    let alice_shared = derive_shared_secret(alice.secret_key(), &bob.public_key()).unwrap();

    let bob_nonce = Nonce::generate().unwrap();
    let ciphertext = encrypt(b"Hello Alice", &bob_nonce, &bob_shared).unwrap();

    let alice_nonce = Nonce::generate().unwrap();
    assert_eq!(
        decrypt(&ciphertext, &alice_nonce, &alice_shared),
        Err(Error::AuthenticationFailed)
    );
}

#[test]
fn tampered_message_fails_party() {
    let (mut bob, mut alice) = connect(SessionConfig::default());

    let sealed = bob.seal_text("Hello Alice").unwrap();
    let mut bytes = sealed.to_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let tampered = SealedMessage::from_bytes(&bytes).unwrap();

    assert_eq!(alice.open(&tampered), Err(Error::AuthenticationFailed));
    assert_eq!(alice.state(), PartyState::Failed);
    assert!(matches!(
        alice.open(&sealed),
        Err(Error::InvalidState { state: "Failed", .. })
    ));
}

#[test]
fn messages_survive_json_transport() {
    let (mut bob, mut alice) = connect(SessionConfig::default());

    let messages = ["first", "Hello Alice , this is Bob! ;'[]{} bla bla", ""];
    let wire: Vec<String> = messages
        .iter()
        .map(|m| bob.seal_text(m).unwrap().to_json().unwrap())
        .collect();

    for (expected, json) in messages.iter().zip(&wire) {
        let sealed = SealedMessage::from_json(json).unwrap();
        assert_eq!(alice.open_text(&sealed).unwrap(), *expected);
    }
}

#[test]
fn public_keys_travel_as_printable_strings() {
    let mut bob = Party::new("bob", SessionConfig::default());
    let mut alice = Party::new("alice", SessionConfig::default());

    let bob_wire = bob.generate_key_pair().unwrap().to_printable();
    let alice_wire = encode_printable(alice.generate_key_pair().unwrap().as_bytes());
    assert_eq!(bob_wire.len(), 44);

    bob.establish(&PublicKey::from_printable(&alice_wire).unwrap()).unwrap();
    let alice_peer = PublicKey::from_slice(&decode_printable(&bob_wire).unwrap()).unwrap();
    alice.establish(&alice_peer).unwrap();

    let sealed = bob.seal(b"via base64").unwrap();
    assert_eq!(alice.open(&sealed).unwrap(), b"via base64");
}

#[test]
fn out_of_order_calls_are_rejected() {
    let mut party = Party::new("carol", SessionConfig::default());
    let sealed = SealedMessage {
        nonce: Nonce::from_bytes([0u8; 24]),
        ciphertext: vec![0u8; 32],
    };

    let err = party.open(&sealed).unwrap_err();
    assert_eq!(err.to_string(), "Cannot open a message while in state Uninitialized");
    assert_eq!(party.state(), PartyState::Uninitialized);
}

#[test]
fn plaintext_cap_applies_to_sender() {
    let config = SessionConfig::default().with_max_plaintext_size(5);
    let (mut bob, _alice) = connect(config);

    assert!(bob.seal_text("12345").is_ok());
    assert_eq!(
        bob.seal_text("123456"),
        Err(Error::MessageTooLarge { size: 6, max: 5 })
    );
}

#[test]
fn differing_domains_cannot_talk() {
    let mut bob = Party::new("bob", SessionConfig::default().with_kdf_domain("app-a-v1"));
    let mut alice = Party::new("alice", SessionConfig::default().with_kdf_domain("app-b-v1"));
    let bob_public = bob.generate_key_pair().unwrap();
    let alice_public = alice.generate_key_pair().unwrap();
    bob.establish(&alice_public).unwrap();
    alice.establish(&bob_public).unwrap();

    let sealed = bob.seal_text("Hello Alice").unwrap();
    assert_eq!(alice.open(&sealed), Err(Error::AuthenticationFailed));
}

#[test]
fn a_third_party_cannot_read() {
    let (mut bob, _alice) = connect(SessionConfig::default());
    let sealed = bob.seal_text("Hello Alice").unwrap();

    let mut eve = Party::new("eve", SessionConfig::default());
    eve.generate_key_pair().unwrap();
    eve.establish(&bob.public_key().unwrap()).unwrap();

    assert_eq!(eve.open(&sealed), Err(Error::AuthenticationFailed));
}
