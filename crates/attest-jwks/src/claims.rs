use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Claims carried by an externally-issued RS256 JWT (e.g. an Auth0
/// access token) once signature, expiry, audience and issuer have all
/// been verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalClaims {
    pub sub: String,
    #[serde(default)]
    pub scope: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub nbf: Option<i64>,
    pub aud: AudienceClaim,
    pub iss: String,
    #[serde(default)]
    pub org_id: Option<String>,
}

/// `aud` may be a single string or an array of strings per RFC 7519 §4.1.3.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AudienceClaim {
    Single(String),
    Many(Vec<String>),
}

impl AudienceClaim {
    pub fn contains(&self, expected: &str) -> bool {
        match self {
            AudienceClaim::Single(s) => s == expected,
            AudienceClaim::Many(list) => list.iter().any(|s| s == expected),
        }
    }
}

impl ExternalClaims {
    fn scopes(&self) -> HashSet<&str> {
        self.scope.split_whitespace().collect()
    }

    /// True iff every scope in `needed` is present in the token's scope
    /// claim. Vacuously true when `needed` is empty.
    pub fn has_scopes(&self, needed: &[&str]) -> bool {
        let granted = self.scopes();
        needed.iter().all(|s| granted.contains(s))
    }
}

/// Standalone helper mirroring [`ExternalClaims::has_scopes`] for callers
/// holding only the parsed claims, not the type.
pub fn check_scopes(claims: &ExternalClaims, needed: &[&str]) -> bool {
    claims.has_scopes(needed)
}
