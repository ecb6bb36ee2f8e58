use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::errors::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// A HMAC key loaded from configuration. Construction requires an explicit
/// `hex:` or `raw:` prefix — ambiguous bare strings are rejected rather than
/// guessed at, per the encoding-prefix requirement for `METRICS_SECRET` /
/// `COMMIT_KEY`.
#[derive(Clone)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn from_prefixed(value: &str) -> Result<Self, CryptoError> {
        if let Some(hex_value) = value.strip_prefix("hex:") {
            let bytes = hex::decode(hex_value).map_err(|err| {
                CryptoError::config_missing(&format!("invalid hex secret: {err}"))
            })?;
            return Ok(Self(bytes));
        }
        if let Some(raw_value) = value.strip_prefix("raw:") {
            return Ok(Self(raw_value.as_bytes().to_vec()));
        }
        Err(CryptoError::config_missing(
            "secret value must carry an explicit hex: or raw: prefix",
        ))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// `hmac_commit(bytes, key) = hex(HMAC-SHA256(key, bytes))`. `bytes` should
/// already be canonical-JSON output so the commitment is stable.
pub fn hmac_commit_hex(key: &SecretKey, canonical_bytes: &[u8]) -> Result<String, CryptoError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|err| CryptoError::unknown(&format!("hmac key init failed: {err}")))?;
    mac.update(canonical_bytes);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison against an expected commitment hex string.
pub fn hmac_verify(
    key: &SecretKey,
    canonical_bytes: &[u8],
    expected_hex: &str,
) -> Result<bool, CryptoError> {
    let actual_hex = hmac_commit_hex(key, canonical_bytes)?;
    Ok(bool::from(
        actual_hex.as_bytes().ct_eq(expected_hex.as_bytes()),
    ))
}
