use std::time::{SystemTime, UNIX_EPOCH};

use attest_crypto::commit::SecretKey;
use attest_crypto::{hmac_commit_hex, hmac_verify, sign_raw, verify_raw, Canonicalizer, JsonCanonicalizer};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::RngCore;
use serde_json::Value;

use crate::errors::PassportError;
use crate::model::{Passport, PassportState};
use crate::state::resolve_state;

/// Packs the exact bytes covered by `sig`: canonical JSON of
/// `(agent_id, session_id, commitment, ttl_s_original, nonce)`. Callers
/// MUST reconstruct this with the passport's *stored* `ttl_s_original`,
/// never a recomputed `(exp - issued_at)` — see the TTL/signature
/// binding rule.
fn signed_message(
    agent_id: &str,
    session_id: &str,
    commitment: &str,
    ttl_s_original: i64,
    nonce: &str,
) -> Result<Vec<u8>, PassportError> {
    let cano = JsonCanonicalizer;
    let value = serde_json::json!({
        "agent_id": agent_id,
        "session_id": session_id,
        "commitment": commitment,
        "ttl_s_original": ttl_s_original,
        "nonce": nonce,
    });
    Ok(cano.canonical_json(&value)?)
}

fn random_nonce_hex() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}

/// Issues a fresh passport. `redacted_metrics` is never stored or
/// transmitted: only its HMAC commitment is. Preconditions: `ttl_s > 0`,
/// `agent_id`/`session_id` non-empty.
pub fn issue_passport(
    signing_key: &SigningKey,
    commit_key: &SecretKey,
    agent_id: &str,
    session_id: &str,
    redacted_metrics: &Value,
    ttl_s: i64,
) -> Result<Passport, PassportError> {
    if ttl_s <= 0 {
        return Err(PassportError::invalid_input("ttl_s must be > 0"));
    }
    if agent_id.trim().is_empty() {
        return Err(PassportError::invalid_input("agent_id must not be empty"));
    }
    if session_id.trim().is_empty() {
        return Err(PassportError::invalid_input("session_id must not be empty"));
    }

    let cano = JsonCanonicalizer;
    let metrics_bytes = cano.canonical_json(redacted_metrics)?;
    let commitment = hmac_commit_hex(commit_key, &metrics_bytes)?;

    let nonce = random_nonce_hex();
    let issued_at = now_unix();
    let exp = issued_at + ttl_s;

    let message = signed_message(agent_id, session_id, &commitment, ttl_s, &nonce)?;
    let sig = sign_raw(signing_key, &message);

    Ok(Passport {
        agent_id: agent_id.to_string(),
        session_id: session_id.to_string(),
        commitment,
        nonce,
        ttl_s_original: ttl_s,
        issued_at,
        exp,
        sig,
        verifying_key: signing_key.verifying_key(),
    })
}

/// Cheap early filter: only the constant-time commitment check, skipping
/// signature verification. Useful for rejecting a wrong-metrics request
/// before paying for a full Ed25519 verify.
pub fn verify_passport_commitment_only(
    passport: &Passport,
    commit_key: &SecretKey,
    expected_metrics: &Value,
) -> Result<bool, PassportError> {
    let cano = JsonCanonicalizer;
    let metrics_bytes = cano.canonical_json(expected_metrics)?;
    Ok(hmac_verify(commit_key, &metrics_bytes, &passport.commitment)?)
}

/// `true` iff: not expired, commitment matches `expected_metrics`, agent
/// and session identifiers match, and the signature verifies under the
/// passport's own embedded `verifying_key` over the message packed from
/// the passport's *stored* `ttl_s_original`.
pub fn verify_passport(
    passport: &Passport,
    commit_key: &SecretKey,
    expected_agent_id: &str,
    expected_session_id: &str,
    expected_metrics: &Value,
) -> Result<bool, PassportError> {
    let now = now_unix();
    if passport.is_expired(now) {
        return Ok(false);
    }
    if passport.agent_id != expected_agent_id || passport.session_id != expected_session_id {
        return Ok(false);
    }
    if !verify_passport_commitment_only(passport, commit_key, expected_metrics)? {
        return Ok(false);
    }

    let message = signed_message(
        &passport.agent_id,
        &passport.session_id,
        &passport.commitment,
        passport.ttl_s_original,
        &passport.nonce,
    )?;
    Ok(verify_raw(&passport.verifying_key, &message, &passport.sig))
}

pub fn public_verifying_key(passport: &Passport) -> VerifyingKey {
    passport.verifying_key
}

/// Same checks as [`verify_passport`], but returns the full state-machine
/// outcome instead of a bare bool: a caller that wants to distinguish
/// `Expired` from `Tampered` (rather than treating both as "not valid")
/// uses this entry point.
pub fn verify_passport_state(
    passport: &Passport,
    commit_key: &SecretKey,
    expected_agent_id: &str,
    expected_session_id: &str,
    expected_metrics: &Value,
) -> Result<PassportState, PassportError> {
    let now = now_unix();

    if passport.agent_id != expected_agent_id || passport.session_id != expected_session_id {
        return Ok(resolve_state(passport, now, false, true));
    }

    if !verify_passport_commitment_only(passport, commit_key, expected_metrics)? {
        return Ok(resolve_state(passport, now, false, true));
    }

    let message = signed_message(
        &passport.agent_id,
        &passport.session_id,
        &passport.commitment,
        passport.ttl_s_original,
        &passport.nonce,
    )?;
    let sig_ok = verify_raw(&passport.verifying_key, &message, &passport.sig);

    Ok(resolve_state(passport, now, sig_ok, false))
}
