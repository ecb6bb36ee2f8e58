use attest_errors::prelude::*;
use thiserror::Error;

/// Thin wrapper so every facade-returned error carries the same
/// `ErrorObj` shape the rest of the attest-* crates use, regardless of
/// which component it originated in.
#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct ServiceError(pub Box<ErrorObj>);

impl ServiceError {
    pub fn inner(&self) -> &ErrorObj {
        &self.0
    }

    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self(Box::new(
            ErrorBuilder::new(codes::BAD_SIGNATURE)
                .user_msg("Authentication failed.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn malformed(msg: &str) -> Self {
        Self(Box::new(
            ErrorBuilder::new(codes::MALFORMED)
                .user_msg("The request body was malformed.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn scope_insufficient(msg: &str) -> Self {
        Self(Box::new(
            ErrorBuilder::new(codes::SCOPE_INSUFFICIENT)
                .user_msg("The caller lacks a required scope.")
                .dev_msg(msg)
                .build(),
        ))
    }
}

impl From<ErrorObj> for ServiceError {
    fn from(value: ErrorObj) -> Self {
        Self(Box::new(value))
    }
}

impl From<attest_crypto::errors::CryptoError> for ServiceError {
    fn from(value: attest_crypto::errors::CryptoError) -> Self {
        Self(Box::new(value.into_inner()))
    }
}

impl From<attest_jwks::errors::JwksError> for ServiceError {
    fn from(value: attest_jwks::errors::JwksError) -> Self {
        Self(Box::new(value.into_inner()))
    }
}

impl From<attest_ledger::errors::LedgerError> for ServiceError {
    fn from(value: attest_ledger::errors::LedgerError) -> Self {
        Self(Box::new(value.into_inner()))
    }
}
