pub mod engine;
pub mod errors;
pub mod model;
pub mod prelude;
#[cfg(feature = "remote")]
pub mod remote;
pub mod state;

pub use engine::{
    issue_passport, public_verifying_key, verify_passport, verify_passport_commitment_only,
    verify_passport_state,
};
pub use errors::PassportError;
pub use model::{Passport, PassportState};
pub use state::resolve_state;
