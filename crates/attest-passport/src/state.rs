use crate::model::{Passport, PassportState};

/// Resolves a passport's state machine outcome for local verification.
/// `Revoked` is not reachable here: passports carry no `jti`, so
/// revocation is only observable for compact tokens (see `attest-ledger`
/// / `attest-service`, which consult the revocation set keyed by `jti`
/// before returning `Verified` for compact-token verification).
pub fn resolve_state(passport: &Passport, now: i64, verified_ok: bool, tampered: bool) -> PassportState {
    if tampered {
        return PassportState::Tampered;
    }
    if passport.is_expired(now) {
        return PassportState::Expired;
    }
    if verified_ok {
        PassportState::Verified
    } else {
        PassportState::Tampered
    }
}
