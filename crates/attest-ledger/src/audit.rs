use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use attest_crypto::canonical::{Canonicalizer, JsonCanonicalizer};
use attest_crypto::commit::SecretKey;

use crate::errors::LedgerError;
use crate::model::{AuditPayload, AuditReceipt};

type HmacSha256 = Hmac<Sha256>;

/// Current unix minute bucket, used as the default `ts_bucket` when the
/// caller doesn't supply one.
fn current_ts_bucket() -> i64 {
    attest_types::time::Timestamp::now().0 / 60
}

/// Computes `(digest, mac)` for a payload without constructing a full
/// [`AuditReceipt`] — a standalone forensic tool mirroring the source
/// implementation's independently callable `recompute`.
pub fn recompute(audit_key: &SecretKey, payload: &AuditPayload) -> Result<(String, String), LedgerError> {
    let value = serde_json::to_value(payload)
        .map_err(|err| LedgerError::storage_unavailable(&format!("payload not serializable: {err}")))?;
    let canonical = JsonCanonicalizer
        .canonical_json(&value)
        .map_err(|err| LedgerError::storage_unavailable(&format!("canonicalization failed: {err}")))?;

    let digest_hex = hex::encode(Sha256::digest(&canonical));

    let mut mac = HmacSha256::new_from_slice(audit_key.as_bytes())
        .map_err(|err| LedgerError::storage_unavailable(&format!("hmac key init failed: {err}")))?;
    mac.update(digest_hex.as_bytes());
    let mac_hex = hex::encode(mac.finalize().into_bytes());

    Ok((digest_hex, mac_hex))
}

/// Builds a deterministic, tamper-evident receipt for a completed action.
/// Identical `(action_id, inputs, lease_ref, result_hash, ts_bucket)` always
/// produces the same `digest`/`mac`.
pub fn audit_receipt(
    audit_key: &SecretKey,
    action_id: &str,
    inputs: Value,
    lease_ref: Option<&str>,
    result_hash: &str,
    ts_bucket: Option<i64>,
) -> Result<AuditReceipt, LedgerError> {
    let payload = AuditPayload {
        action_id: action_id.to_string(),
        inputs,
        lease_ref: lease_ref.map(str::to_string),
        result_hash: result_hash.to_string(),
        ts_bucket: ts_bucket.unwrap_or_else(current_ts_bucket),
    };

    let (digest, mac) = recompute(audit_key, &payload)?;

    Ok(AuditReceipt {
        payload,
        digest,
        mac,
    })
}

/// Recomputes `digest`/`mac` from `receipt.payload` and compares both
/// against the carried values in constant time. Any mutation of `payload`,
/// `digest`, or `mac` breaks this check.
pub fn verify_receipt(audit_key: &SecretKey, receipt: &AuditReceipt) -> Result<bool, LedgerError> {
    let (expected_digest, expected_mac) = recompute(audit_key, &receipt.payload)?;

    let digest_ok = bool::from(expected_digest.as_bytes().ct_eq(receipt.digest.as_bytes()));
    let mac_ok = bool::from(expected_mac.as_bytes().ct_eq(receipt.mac.as_bytes()));

    Ok(digest_ok && mac_ok)
}
