pub use crate::audit::{audit_receipt, recompute, verify_receipt};
pub use crate::errors::LedgerError;
pub use crate::ledger::{InMemoryLedger, KeyLedger, PassportLedger, RevocationStore};
pub use crate::model::{AuditPayload, AuditReceipt, KeyRecord, KeyStatus, PassportRecord, RevocationEntry};
pub use crate::policy::quorum_3_of_5;
