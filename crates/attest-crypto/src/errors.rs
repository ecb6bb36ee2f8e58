use attest_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct CryptoError(pub Box<ErrorObj>);

impl CryptoError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn canonical(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::MALFORMED)
                .user_msg("Canonicalisation failed for provided payload.")
                .dev_msg(msg),
        )
    }

    pub fn digest(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::MALFORMED)
                .user_msg("Digest computation failed.")
                .dev_msg(msg),
        )
    }

    pub fn unsupported(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::ALG_UNSUPPORTED)
                .user_msg("Requested algorithm is not supported.")
                .dev_msg(msg),
        )
    }

    pub fn signature_invalid(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::BAD_SIGNATURE)
                .user_msg("Signature verification failed.")
                .dev_msg(msg),
        )
    }

    pub fn keystore_unavailable(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::CONFIG_MISSING)
                .user_msg("Signing key is not available.")
                .dev_msg(msg),
        )
    }

    pub fn keystore_forbidden(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::KID_UNKNOWN)
                .user_msg("Key access denied, unknown, or revoked.")
                .dev_msg(msg),
        )
    }

    pub fn config_missing(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::CONFIG_MISSING)
                .user_msg("Required cryptographic configuration is missing.")
                .dev_msg(msg),
        )
    }

    pub fn unknown(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::INTERNAL)
                .user_msg("Internal crypto error.")
                .dev_msg(msg),
        )
    }

    fn from_builder(builder: ErrorBuilder) -> Self {
        CryptoError(Box::new(builder.build()))
    }
}

impl From<ErrorObj> for CryptoError {
    fn from(value: ErrorObj) -> Self {
        CryptoError(Box::new(value))
    }
}
