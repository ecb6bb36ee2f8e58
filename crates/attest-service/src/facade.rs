use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest as ShaDigest, Sha256};

use attest_crypto::canonical::{Canonicalizer, JsonCanonicalizer};
use attest_crypto::commit::{hmac_commit_hex, SecretKey};
use attest_crypto::sign::{decode_compact, encode_compact};
use attest_crypto::MemoryKeyTable;
use attest_jwks::cache::JwksCache;
use attest_jwks::claims::check_scopes;
use attest_ledger::ledger::{PassportLedger, RevocationStore};
use attest_ledger::model::PassportRecord;
use attest_ledger::InMemoryLedger;
use attest_types::time::Timestamp;

use crate::errors::ServiceError;
use crate::metrics::{ServiceMetrics, ServiceMetricsSnapshot, VerifyOutcome};

#[derive(Debug, Clone, Deserialize)]
pub struct IssueRequest {
    pub sub: String,
    pub scope: Vec<String>,
    #[serde(default)]
    pub ttl: Option<i64>,
    pub nonce: String,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub raw: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueResponse {
    pub token: String,
    pub kid: u64,
    pub jti: String,
    pub exp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerifyResponse {
    fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevokeRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevokeResponse {
    pub ok: bool,
    pub jti: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DidResponse {
    pub did: String,
    pub kid: u64,
    pub alg: &'static str,
}

/// Composes C1 (codec), C2 (crypto), C5 (ledger), and optionally C6
/// (JWKS) behind the external HTTP protocol, as typed
/// request/response structs rather than raw JSON — a pure dispatch
/// table that a transport binary mounts, with no axum dependency of
/// its own.
#[derive(Clone)]
pub struct ServiceFacade {
    issuer: String,
    keystore: MemoryKeyTable,
    commit_key: SecretKey,
    ttl_default: i64,
    ledger: Arc<InMemoryLedger>,
    jwks: Option<Arc<JwksAuth>>,
    metrics: ServiceMetrics,
}

pub struct JwksAuth {
    pub cache: JwksCache,
    pub audience: String,
    pub issuer: String,
}

impl ServiceFacade {
    pub fn new(
        issuer: String,
        keystore: MemoryKeyTable,
        commit_key: SecretKey,
        ttl_default: i64,
        ledger: Arc<InMemoryLedger>,
        jwks: Option<Arc<JwksAuth>>,
    ) -> Self {
        Self {
            issuer,
            keystore,
            commit_key,
            ttl_default,
            ledger,
            jwks,
            metrics: ServiceMetrics::default(),
        }
    }

    pub fn healthz(&self) -> Value {
        json!({ "ok": true })
    }

    /// Snapshot of the C9 passports-issued / verify-outcome counters.
    pub fn metrics(&self) -> ServiceMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn did(&self) -> DidResponse {
        DidResponse {
            did: self.issuer.clone(),
            kid: self.keystore.current_kid(),
            alg: "Ed25519",
        }
    }

    /// Authenticates `bearer_token` against the configured JWKS issuer
    /// (when one is configured) and checks it carries every scope in
    /// `req.scope`. With no JWKS configured, the caller is trusted as-is
    /// (single-tenant / local-development deployments).
    async fn authorize_issue(&self, bearer_token: Option<&str>, req: &IssueRequest) -> Result<(), ServiceError> {
        let Some(jwks) = self.jwks.as_ref() else {
            return Ok(());
        };
        let token = bearer_token.ok_or_else(|| ServiceError::unauthorized("missing bearer token"))?;
        let claims = attest_jwks::verify::verify_external_jwt(&jwks.cache, token, &jwks.audience, &jwks.issuer)
            .await?;
        let needed: Vec<&str> = req.scope.iter().map(String::as_str).collect();
        if !check_scopes(&claims, &needed) {
            return Err(ServiceError::scope_insufficient("caller jwt missing requested scope(s)"));
        }
        Ok(())
    }

    pub async fn issue(&self, bearer_token: Option<&str>, req: IssueRequest) -> Result<IssueResponse, ServiceError> {
        self.authorize_issue(bearer_token, &req).await?;

        let ttl = req.ttl.filter(|t| *t > 0).unwrap_or(self.ttl_default);
        let now = Timestamp::now().0;
        let exp = now + ttl;
        let jti = random_hex_128();
        let kid = self.keystore.current_kid();

        let mtag = issuance_mtag(&self.commit_key, &req.sub, &req.scope, req.org_id.as_deref(), &req.nonce)?;

        let header = json!({ "alg": "Ed25519", "kid": kid, "typ": "attest" });
        let mut payload = json!({
            "iss": self.issuer,
            "sub": req.sub,
            "scope": req.scope,
            "iat": now,
            "exp": exp,
            "jti": jti,
            "nonce": req.nonce,
            "kid": kid,
            "mtag": mtag,
        });
        if let Some(org_id) = &req.org_id {
            payload["org_id"] = json!(org_id);
        }

        let token = encode_compact(&self.keystore, &header, &payload)?;

        self.ledger.record_passport(PassportRecord {
            jti: jti.clone(),
            sub: req.sub.clone(),
            org_id: req.org_id.clone(),
            scope: req.scope.clone(),
            kid,
            iat: now,
            exp,
            nonce: req.nonce.clone(),
            ip_hash: None,
            metrics_tag: mtag,
            sig: token.rsplit('.').next().unwrap_or_default().to_string(),
        })?;

        self.metrics.record_passport_issued();
        Ok(IssueResponse { token, kid, jti, exp })
    }

    pub fn verify(&self, req: VerifyRequest) -> VerifyResponse {
        let decoded = match decode_compact(&self.keystore, &req.token) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.metrics.record_verify(VerifyOutcome::Tampered);
                return VerifyResponse::invalid(format!("verification failed: {err}"));
            }
        };

        let jti = match decoded.payload.get("jti").and_then(Value::as_str) {
            Some(jti) => jti.to_string(),
            None => {
                self.metrics.record_verify(VerifyOutcome::Tampered);
                return VerifyResponse::invalid("missing jti");
            }
        };

        if self.ledger.is_revoked(&jti) {
            self.metrics.record_verify(VerifyOutcome::Revoked);
            return VerifyResponse::invalid("revoked");
        }

        let exp = decoded.payload.get("exp").and_then(Value::as_i64).unwrap_or(0);
        if Timestamp::now().0 >= exp {
            self.metrics.record_verify(VerifyOutcome::Expired);
            return VerifyResponse::invalid("expired");
        }

        let sub = decoded.payload.get("sub").and_then(Value::as_str).map(str::to_string);
        let scope = decoded
            .payload
            .get("scope")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect());
        let org_id = decoded.payload.get("org_id").and_then(Value::as_str).map(str::to_string);
        let kid = decoded.payload.get("kid").and_then(Value::as_u64);

        self.metrics.record_verify(VerifyOutcome::Valid);
        VerifyResponse {
            valid: true,
            sub,
            scope,
            org_id,
            exp: Some(exp),
            kid,
            jti: Some(jti),
            reason: None,
        }
    }

    pub fn revoke(&self, req: RevokeRequest) -> Result<RevokeResponse, ServiceError> {
        let jti = match (req.jti, req.token) {
            (Some(jti), _) => jti,
            (None, Some(token)) => {
                let decoded = decode_compact(&self.keystore, &token)?;
                decoded
                    .payload
                    .get("jti")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| ServiceError::malformed("token carries no jti"))?
            }
            (None, None) => return Err(ServiceError::malformed("either token or jti is required")),
        };

        self.ledger.revoke(&jti, req.reason, None);
        Ok(RevokeResponse { ok: true, jti })
    }
}

fn random_hex_128() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Commitment over the issuance context, carried as the compact token's
/// `mtag` field; binds the token to the exact scope/nonce it was minted
/// for the same way a passport's `commitment` binds it to its metrics.
fn issuance_mtag(
    key: &SecretKey,
    sub: &str,
    scope: &[String],
    org_id: Option<&str>,
    nonce: &str,
) -> Result<String, ServiceError> {
    let value = json!({ "sub": sub, "scope": scope, "org_id": org_id, "nonce": nonce });
    let canonical = JsonCanonicalizer.canonical_json(&value)?;
    Ok(hmac_commit_hex(key, &canonical)?)
}

/// Hashes a client IP for forensic trace storage; the service never
/// retains a raw IP address.
pub fn hash_ip(ip: &str) -> String {
    hex::encode(Sha256::digest(ip.as_bytes()))
}
