use attest_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct LeaseError(pub Box<ErrorObj>);

impl LeaseError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn invalid(msg: &str) -> Self {
        Self(Box::new(
            ErrorBuilder::new(codes::LEASE_INVALID)
                .user_msg("The capability lease is invalid.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn scope_insufficient(msg: &str) -> Self {
        Self(Box::new(
            ErrorBuilder::new(codes::SCOPE_INSUFFICIENT)
                .user_msg("The lease does not cover the requested scope.")
                .dev_msg(msg)
                .build(),
        ))
    }
}

impl From<ErrorObj> for LeaseError {
    fn from(value: ErrorObj) -> Self {
        LeaseError(Box::new(value))
    }
}
