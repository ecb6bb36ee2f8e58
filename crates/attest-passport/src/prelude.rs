pub use crate::engine::{
    issue_passport, public_verifying_key, verify_passport, verify_passport_commitment_only,
    verify_passport_state,
};
pub use crate::errors::PassportError;
pub use crate::model::{Passport, PassportState};
pub use crate::state::resolve_state;

#[cfg(feature = "remote")]
pub use crate::remote::{verify_remote, RemoteVerifyClaims, RemoteVerifyRequest, VerifyResult};
