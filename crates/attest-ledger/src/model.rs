use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Forensic record of a single issuance, keyed by `jti`. Mirrors the
/// `passports` table of the logical schema: written once at issue time,
/// read by revocation and audit tooling, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassportRecord {
    pub jti: String,
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    pub scope: Vec<String>,
    pub kid: u64,
    pub iat: i64,
    pub exp: i64,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_hash: Option<String>,
    pub metrics_tag: String,
    pub sig: String,
}

/// One row of the `revocations` table, keyed uniquely by `jti`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevocationEntry {
    pub jti: String,
    pub revoked_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_user: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    Active,
    Retired,
    Compromised,
}

/// One row of the `keys` table: `(kid, alg, status, created_at)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyRecord {
    pub kid: u64,
    pub alg: String,
    pub status: KeyStatus,
    pub created_at: i64,
}

/// The deterministic content hashed and MAC'd into an [`AuditReceipt`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditPayload {
    pub action_id: String,
    pub inputs: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_ref: Option<String>,
    pub result_hash: String,
    pub ts_bucket: i64,
}

/// A tamper-evident record of a completed action: `digest` is the SHA-256
/// hex of the canonical payload, `mac` is the HMAC-SHA256 hex of that
/// digest under the audit key. Deterministic given identical inputs and
/// `ts_bucket`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditReceipt {
    pub payload: AuditPayload,
    pub digest: String,
    pub mac: String,
}
