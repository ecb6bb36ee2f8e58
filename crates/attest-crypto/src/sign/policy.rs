use serde::{Deserialize, Serialize};

use crate::errors::CryptoError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyPolicy {
    pub kid: u64,
    pub issued_at_ms: i64,
    pub revoked: bool,
    pub compromised: bool,
}

impl KeyPolicy {
    pub fn new(kid: u64, issued_at_ms: i64) -> Self {
        Self {
            kid,
            issued_at_ms,
            revoked: false,
            compromised: false,
        }
    }

    pub fn is_active(&self) -> Result<(), CryptoError> {
        if self.compromised {
            return Err(CryptoError::keystore_forbidden(&format!(
                "key {} is marked compromised",
                self.kid
            )));
        }
        if self.revoked {
            return Err(CryptoError::keystore_forbidden(&format!(
                "key {} has been retired",
                self.kid
            )));
        }
        Ok(())
    }
}
