pub mod keystore;
pub mod policy;

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use serde_json::Value;

use crate::base64url;
use crate::canonical::{Canonicalizer, JsonCanonicalizer};
use crate::errors::CryptoError;

use super::keystore::{KeyTable, VerifyKeyMaterial};

/// Signs 64-byte Ed25519 signatures over arbitrary message bytes. Used
/// directly by the passport engine, which packs its own signing input
/// rather than going through the compact-token envelope.
pub trait Signer: Send + Sync {
    fn sign(&self, message: &[u8]) -> Result<[u8; 64], CryptoError>;
    fn verifying_key(&self) -> VerifyingKey;
    fn kid(&self) -> u64;
}

pub trait Verifier: Send + Sync {
    fn verify(&self, message: &[u8], signature: &[u8; 64], verifying_key: &VerifyingKey) -> bool;
}

#[derive(Clone)]
pub struct Ed25519Signer<K: KeyTable> {
    pub keystore: K,
}

#[derive(Clone, Default)]
pub struct Ed25519Verifier;

impl<K: KeyTable> Signer for Ed25519Signer<K> {
    fn sign(&self, message: &[u8]) -> Result<[u8; 64], CryptoError> {
        let material = self.keystore.current_signing_key()?;
        Ok(material.signing_key.sign(message).to_bytes())
    }

    fn verifying_key(&self) -> VerifyingKey {
        self.keystore
            .current_signing_key()
            .map(|m| m.verifying_key)
            .expect("signing key must be loaded")
    }

    fn kid(&self) -> u64 {
        self.keystore.current_kid()
    }
}

impl Verifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &[u8; 64], verifying_key: &VerifyingKey) -> bool {
        let sig = Signature::from_bytes(signature);
        verifying_key.verify(message, &sig).is_ok()
    }
}

/// Verifies a raw Ed25519 signature by looking the `kid` up in a key table
/// first. Used for compact-token verification where the key isn't carried
/// inline.
pub fn verify_by_kid<K: KeyTable>(
    keystore: &K,
    kid: u64,
    message: &[u8],
    signature: &[u8; 64],
) -> Result<(), CryptoError> {
    let VerifyKeyMaterial { verifying_key, .. } = keystore.key_for_verification(kid)?;
    let sig = Signature::from_bytes(signature);
    verifying_key
        .verify(message, &sig)
        .map_err(|err| CryptoError::signature_invalid(&format!("signature invalid: {err}")))
}

/// Three-segment compact token: `b64url(header).b64url(payload).b64url(sig)`,
/// each segment canonical-JSON bytes except the signature. The signature
/// covers the ASCII bytes `"{header_segment}.{payload_segment}"`.
pub fn encode_compact<K: KeyTable>(
    keystore: &K,
    header: &Value,
    payload: &Value,
) -> Result<String, CryptoError> {
    let cano = JsonCanonicalizer;
    let header_bytes = cano.canonical_json(header)?;
    let payload_bytes = cano.canonical_json(payload)?;
    let header_seg = base64url::encode(&header_bytes);
    let payload_seg = base64url::encode(&payload_bytes);

    let signing_input = format!("{header_seg}.{payload_seg}");
    let material = keystore.current_signing_key()?;
    let signature = material.signing_key.sign(signing_input.as_bytes()).to_bytes();
    let sig_seg = base64url::encode(&signature);

    Ok(format!("{signing_input}.{sig_seg}"))
}

pub struct DecodedCompact {
    pub header: Value,
    pub payload: Value,
}

/// Parses and verifies a compact token. Returns `CryptoError::canonical` for
/// structural problems (segment count, base64, JSON) and
/// `CryptoError::signature_invalid` for a bad signature.
pub fn decode_compact<K: KeyTable>(keystore: &K, token: &str) -> Result<DecodedCompact, CryptoError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(CryptoError::canonical("token must have exactly 3 segments"));
    }
    let header_bytes = base64url::decode(segments[0])?;
    let payload_bytes = base64url::decode(segments[1])?;
    let signature_bytes = base64url::decode(segments[2])?;
    let signature: [u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| CryptoError::signature_invalid("invalid signature length"))?;

    let header: Value = serde_json::from_slice(&header_bytes)
        .map_err(|err| CryptoError::canonical(&format!("invalid header json: {err}")))?;
    let payload: Value = serde_json::from_slice(&payload_bytes)
        .map_err(|err| CryptoError::canonical(&format!("invalid payload json: {err}")))?;

    let kid = header
        .get("kid")
        .and_then(Value::as_u64)
        .ok_or_else(|| CryptoError::canonical("header missing integer kid"))?;

    let signing_input = format!("{}.{}", segments[0], segments[1]);
    verify_by_kid(keystore, kid, signing_input.as_bytes(), &signature)?;

    Ok(DecodedCompact { header, payload })
}

/// Low-level raw Ed25519 sign over an arbitrary signing key, used by the
/// passport engine which carries its own verifying key inline rather than
/// resolving one from a kid-keyed table.
pub fn sign_raw(signing_key: &SigningKey, message: &[u8]) -> [u8; 64] {
    signing_key.sign(message).to_bytes()
}

pub fn verify_raw(verifying_key: &VerifyingKey, message: &[u8], signature: &[u8; 64]) -> bool {
    let sig = Signature::from_bytes(signature);
    verifying_key.verify(message, &sig).is_ok()
}
