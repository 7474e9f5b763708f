//! Property-based tests for token verification
//!
//! Uses proptest to check that:
//! - Any single-bit change to a valid signature is rejected
//! - Any change to the signed claims is rejected
//! - Arbitrary input is rejected with an error, never a panic

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::{encode_segment, fixture_bytes, fixture_token};
use proptest::prelude::*;
use serde_json::Value;
use std::sync::LazyLock;
use x5c_verifier::{Error, Rs256Verifier};

static VERIFIER: LazyLock<Rs256Verifier> = LazyLock::new(|| {
    Rs256Verifier::from_json(&fixture_bytes("valid_jwks.json")).expect("Failed to parse JWKS")
});

static TOKEN: LazyLock<String> = LazyLock::new(|| fixture_token("valid.jwt"));

/// Strategy for strings shaped like compact tokens
fn token_shaped_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{0,64}\\.[A-Za-z0-9_-]{0,64}\\.[A-Za-z0-9_-]{0,64}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: Flipping any bit of the signature invalidates it
    #[test]
    fn prop_signature_bit_flip_rejected(bit in 0usize..4096) {
        let (signing_input, signature) = TOKEN.rsplit_once('.').unwrap();
        let mut signature = URL_SAFE_NO_PAD.decode(signature).unwrap();
        signature[bit / 8] ^= 1 << (bit % 8);
        let forged = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(&signature));

        let err = VERIFIER.verify(&forged).unwrap_err();
        prop_assert_eq!(err, Error::SignatureInvalid);
    }

    /// Property: Replacing the subject invalidates the signature
    #[test]
    fn prop_changed_subject_rejected(sub in "[a-zA-Z0-9]{1,32}") {
        prop_assume!(sub != "1234567890");

        let parts: Vec<&str> = TOKEN.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let mut claims: Value = serde_json::from_slice(&payload).unwrap();
        claims["sub"] = Value::String(sub);
        let forged = format!("{}.{}.{}", parts[0], encode_segment(&claims), parts[2]);

        let err = VERIFIER.verify(&forged).unwrap_err();
        prop_assert_eq!(err, Error::SignatureInvalid);
    }

    /// Property: Arbitrary strings are rejected without panicking
    #[test]
    fn prop_arbitrary_input_rejected(input in any::<String>()) {
        prop_assert!(VERIFIER.verify(&input).is_err());
    }

    /// Property: Token-shaped garbage is rejected without panicking
    #[test]
    fn prop_token_shaped_garbage_rejected(input in token_shaped_strategy()) {
        prop_assert!(VERIFIER.verify(&input).is_err());
    }
}

/// Test: The unmodified token verifies, so the properties above test tampering
#[test]
fn test_baseline_token_verifies() {
    assert!(VERIFIER.verify(&TOKEN).is_ok());
}
