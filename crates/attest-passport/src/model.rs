use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

/// A signed, self-contained attestation envelope. Binds a subject
/// (`agent_id`, `session_id`), a privacy-preserving commitment over
/// private per-session metrics, an expiry, and a single-use nonce.
///
/// `ttl_s_original` — not a value recomputed from `exp - issued_at` — is
/// the quantity covered by `sig`. This keeps verification stable across
/// clock skew: the signed message packs the TTL the issuer actually
/// chose, not a derived one a verifier might reconstruct differently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Passport {
    pub agent_id: String,
    pub session_id: String,
    pub commitment: String,
    pub nonce: String,
    pub ttl_s_original: i64,
    pub issued_at: i64,
    pub exp: i64,
    #[serde(with = "sig_b64")]
    pub sig: [u8; 64],
    #[serde(with = "vk_b64")]
    pub verifying_key: VerifyingKey,
}

impl Passport {
    /// Cheap pre-filter: `true` once `now >= exp`. Does not touch the
    /// signature or commitment, so callers can skip the constant-time
    /// work entirely for a passport that's already stale.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassportState {
    Fresh,
    Verified,
    Expired,
    Tampered,
    Revoked,
}

mod sig_b64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sig: &[u8; 64], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&attest_crypto::base64url::encode(sig))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<[u8; 64], D::Error> {
        let raw = String::deserialize(de)?;
        let bytes = attest_crypto::base64url::decode(&raw).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("signature must be 64 bytes"))
    }
}

mod vk_b64 {
    use ed25519_dalek::VerifyingKey;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(vk: &VerifyingKey, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&attest_crypto::base64url::encode(vk.as_bytes()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<VerifyingKey, D::Error> {
        let raw = String::deserialize(de)?;
        let bytes = attest_crypto::base64url::decode(&raw).map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("verifying key must be 32 bytes"))?;
        VerifyingKey::from_bytes(&arr).map_err(serde::de::Error::custom)
    }
}
