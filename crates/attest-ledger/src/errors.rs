use attest_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct LedgerError(pub Box<ErrorObj>);

impl LedgerError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn not_found(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::NOT_FOUND)
                .user_msg("The requested record was not found.")
                .dev_msg(msg),
        )
    }

    pub fn storage_unavailable(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::STORAGE_UNAVAILABLE)
                .user_msg("The ledger is temporarily unavailable.")
                .dev_msg(msg),
        )
    }

    pub fn quorum_insufficient(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::QUORUM_INSUFFICIENT)
                .user_msg("This operation requires more approvers.")
                .dev_msg(msg),
        )
    }

    fn from_builder(builder: ErrorBuilder) -> Self {
        LedgerError(Box::new(builder.build()))
    }
}

impl From<ErrorObj> for LedgerError {
    fn from(value: ErrorObj) -> Self {
        LedgerError(Box::new(value))
    }
}
