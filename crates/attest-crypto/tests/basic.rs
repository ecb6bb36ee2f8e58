use attest_crypto::prelude::*;
use serde_json::json;

#[test]
fn canonical_json_is_stable_and_rejects_float() {
    let cano = JsonCanonicalizer::default();
    let a = json!({"b":2,"a":1,"c":{"y":1,"x":2},"arr":[3,2,1]});
    let b = json!({"c":{"x":2,"y":1},"a":1,"arr":[3,2,1],"b":2});

    let ca = cano.canonical_json(&a).unwrap();
    let cb = cano.canonical_json(&b).unwrap();
    assert_eq!(ca, cb);

    let f = json!({"a": 1.23});
    assert!(cano.canonical_json(&f).is_err());
}

#[test]
fn digest_is_deterministic() {
    let cano = JsonCanonicalizer::default();
    let dig = DefaultDigester::default();
    let payload = json!({"a":1,"b":2});
    let d1 = dig.commit_json(&cano, &payload, "sha256").unwrap();
    let d2 = dig.commit_json(&cano, &payload, "sha256").unwrap();
    assert_eq!(d1, d2);
    assert!(!d1.as_base64url().is_empty());
}

#[test]
fn secret_key_requires_explicit_prefix() {
    assert!(SecretKey::from_prefixed("ambiguous-secret").is_err());
    assert!(SecretKey::from_prefixed("hex:deadbeef").is_ok());
    assert!(SecretKey::from_prefixed("raw:dev-commit-key").is_ok());
    assert!(SecretKey::from_prefixed("hex:not-hex").is_err());
}

#[test]
fn hmac_commit_is_deterministic_and_constant_time_checked() {
    let key = SecretKey::from_prefixed("raw:test-secret").unwrap();
    let cano = JsonCanonicalizer::default();
    let metrics = json!({"ver":1,"status":"ok"});
    let bytes = cano.canonical_json(&metrics).unwrap();

    let commit1 = hmac_commit_hex(&key, &bytes).unwrap();
    let commit2 = hmac_commit_hex(&key, &bytes).unwrap();
    assert_eq!(commit1, commit2);
    assert!(hmac_verify(&key, &bytes, &commit1).unwrap());

    let other = cano
        .canonical_json(&json!({"ver":1,"status":"bad"}))
        .unwrap();
    assert!(!hmac_verify(&key, &other, &commit1).unwrap());
}

#[cfg(feature = "sign-ed25519")]
#[test]
fn compact_token_round_trips_and_rejects_tamper() {
    let ks = MemoryKeyTable::generate();
    let header = json!({"alg": "Ed25519", "kid": ks.current_kid(), "typ": "attest"});
    let payload = json!({"iss": "attest-svc", "sub": "agent-1", "scope": ["tool:x"]});

    let token = encode_compact(&ks, &header, &payload).unwrap();
    let decoded = decode_compact(&ks, &token).unwrap();
    assert_eq!(decoded.payload["sub"], "agent-1");

    let mut tampered = token.clone();
    tampered.push('x');
    assert!(decode_compact(&ks, &tampered).is_err());

    let parts: Vec<&str> = token.split('.').collect();
    let forged = format!("{}.{}.{}", parts[0], parts[1], parts[2].replacen('a', "b", 1));
    if forged != token {
        assert!(decode_compact(&ks, &forged).is_err());
    }
}

#[cfg(feature = "sign-ed25519")]
#[test]
fn raw_sign_verify_detects_single_byte_mutation() {
    let ks = MemoryKeyTable::generate();
    let material = ks.current_signing_key().unwrap();
    let message = b"agent-1|session-1|commitment|60|nonce";
    let sig = sign_raw(&material.signing_key, message);
    assert!(verify_raw(&material.verifying_key, message, &sig));

    let mut bad_sig = sig;
    bad_sig[0] ^= 0x01;
    assert!(!verify_raw(&material.verifying_key, message, &bad_sig));

    let mut bad_message = message.to_vec();
    bad_message[0] ^= 0x01;
    assert!(!verify_raw(&material.verifying_key, &bad_message, &sig));
}

#[cfg(feature = "sign-ed25519")]
#[test]
fn load_or_generate_persists_key_with_owner_only_permissions() {
    let dir = std::env::temp_dir().join(format!("attest-keystore-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("signing.key");
    let _ = std::fs::remove_file(&path);

    assert!(MemoryKeyTable::load_or_generate(&path, false).is_err());

    let ks1 = MemoryKeyTable::load_or_generate(&path, true).unwrap();
    assert!(path.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    let ks2 = MemoryKeyTable::load_or_generate(&path, false).unwrap();
    assert_eq!(
        ks1.current_signing_key().unwrap().verifying_key,
        ks2.current_signing_key().unwrap().verifying_key
    );

    std::fs::remove_file(&path).ok();
    std::fs::remove_dir(&dir).ok();
}

#[cfg(feature = "sign-ed25519")]
#[test]
fn retired_kid_fails_verification() {
    let ks = MemoryKeyTable::generate();
    let kid = ks.current_kid();
    let header = json!({"alg": "Ed25519", "kid": kid, "typ": "attest"});
    let payload = json!({"sub": "agent-1"});
    let token = encode_compact(&ks, &header, &payload).unwrap();

    ks.retire(kid);
    assert!(decode_compact(&ks, &token).is_err());
}
