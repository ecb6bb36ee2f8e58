use attest_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct JwksError(pub Box<ErrorObj>);

impl JwksError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn unavailable(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::JWKS_UNAVAILABLE)
                .user_msg("The signing key service is unavailable. Please retry later.")
                .dev_msg(msg),
        )
    }

    pub fn malformed(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::JWKS_MALFORMED)
                .user_msg("The signing key service returned malformed data.")
                .dev_msg(msg),
        )
    }

    pub fn alg_unsupported(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::ALG_UNSUPPORTED)
                .user_msg("The token algorithm is not supported.")
                .dev_msg(msg),
        )
    }

    pub fn kid_missing(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::KID_MISSING)
                .user_msg("The token is missing a key id.")
                .dev_msg(msg),
        )
    }

    pub fn kid_unknown(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::KID_UNKNOWN)
                .user_msg("The signing key is unknown.")
                .dev_msg(msg),
        )
    }

    pub fn bad_signature(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::BAD_SIGNATURE)
                .user_msg("Signature verification failed.")
                .dev_msg(msg),
        )
    }

    pub fn token_expired(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::TOKEN_EXPIRED)
                .user_msg("The token has expired.")
                .dev_msg(msg),
        )
    }

    pub fn token_not_yet_valid(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::TOKEN_NOT_YET_VALID)
                .user_msg("The token is not yet valid.")
                .dev_msg(msg),
        )
    }

    pub fn audience_mismatch(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::AUDIENCE_MISMATCH)
                .user_msg("The token audience does not match.")
                .dev_msg(msg),
        )
    }

    pub fn issuer_mismatch(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::ISSUER_MISMATCH)
                .user_msg("The token issuer does not match.")
                .dev_msg(msg),
        )
    }

    fn from_builder(builder: ErrorBuilder) -> Self {
        JwksError(Box::new(builder.build()))
    }
}

impl From<ErrorObj> for JwksError {
    fn from(value: ErrorObj) -> Self {
        JwksError(Box::new(value))
    }
}
