use attest_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct PassportError(pub Box<ErrorObj>);

impl PassportError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn malformed(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::MALFORMED)
                .user_msg("The passport is malformed.")
                .dev_msg(msg),
        )
    }

    pub fn bad_signature(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::BAD_SIGNATURE)
                .user_msg("Passport signature verification failed.")
                .dev_msg(msg),
        )
    }

    pub fn expired(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::TOKEN_EXPIRED)
                .user_msg("The passport has expired.")
                .dev_msg(msg),
        )
    }

    pub fn revoked(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::TOKEN_REVOKED)
                .user_msg("The passport has been revoked.")
                .dev_msg(msg),
        )
    }

    pub fn invalid_input(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::MALFORMED)
                .user_msg("Passport issuance input is invalid.")
                .dev_msg(msg),
        )
    }

    fn from_builder(builder: ErrorBuilder) -> Self {
        PassportError(Box::new(builder.build()))
    }
}

impl From<ErrorObj> for PassportError {
    fn from(value: ErrorObj) -> Self {
        PassportError(Box::new(value))
    }
}

impl From<attest_crypto::errors::CryptoError> for PassportError {
    fn from(value: attest_crypto::errors::CryptoError) -> Self {
        PassportError(Box::new(value.into_inner()))
    }
}
