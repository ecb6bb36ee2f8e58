pub use crate::canonical::{Canonicalizer, JsonCanonicalizer};
pub use crate::commit::{hmac_commit_hex, hmac_verify, SecretKey};
pub use crate::digest::{DefaultDigester, Digest, Digester};
pub use crate::errors::CryptoError;
#[cfg(feature = "observe")]
pub use crate::metrics::spec as metrics_spec;
pub use crate::metrics::{CryptoMetrics, CryptoMetricsSnapshot};
#[cfg(feature = "sign-ed25519")]
pub use crate::sign::keystore::{KeyTable, MemoryKeyTable};
#[cfg(feature = "sign-ed25519")]
pub use crate::sign::{
    decode_compact, encode_compact, sign_raw, verify_raw, Ed25519Signer, Ed25519Verifier, Signer,
    Verifier,
};
