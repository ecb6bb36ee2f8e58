pub mod base64url;
pub mod canonical;
pub mod commit;
pub mod digest;
pub mod errors;
pub mod metrics;
pub mod prelude;
#[cfg(feature = "sign-ed25519")]
pub mod sign;

pub use canonical::{Canonicalizer, JsonCanonicalizer};
pub use commit::{hmac_commit_hex, hmac_verify, SecretKey};
pub use digest::{DefaultDigester, Digest, Digester};
#[cfg(feature = "observe")]
pub use metrics::spec as metrics_spec;
pub use metrics::{CryptoMetrics, CryptoMetricsSnapshot};
#[cfg(feature = "sign-ed25519")]
pub use sign::keystore::{KeyTable, MemoryKeyTable};
#[cfg(feature = "sign-ed25519")]
pub use sign::{decode_compact, encode_compact, sign_raw, verify_raw, Ed25519Signer, Ed25519Verifier, Signer, Verifier};
