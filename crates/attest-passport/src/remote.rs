use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
pub struct RemoteVerifyRequest {
    pub passport_b64: String,
    pub metrics_tag: String,
    pub scope: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RemoteVerifyClaims {
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VerifyResult {
    pub ok: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub claims: Option<RemoteVerifyClaims>,
}

impl VerifyResult {
    fn remote_error(detail: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            reason: Some(format!("remote error: {detail}")),
            claims: None,
        }
    }
}

/// POSTs the envelope to a configured centralized verifier. Transport
/// failures are reported as `VerifyResult { ok: false, .. }`, never as an
/// `Err` — the caller can fall back to `verify_local` on any non-ok
/// result without matching on error types.
#[cfg(feature = "remote")]
pub async fn verify_remote(
    verifier_url: &str,
    passport_b64: &str,
    metrics_tag: &str,
    scope: &[String],
    timeout: Duration,
) -> VerifyResult {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(c) => c,
        Err(e) => return VerifyResult::remote_error(e),
    };

    let body = RemoteVerifyRequest {
        passport_b64: passport_b64.to_string(),
        metrics_tag: metrics_tag.to_string(),
        scope: scope.to_vec(),
    };

    let response = match client.post(verifier_url).json(&body).send().await {
        Ok(r) => r,
        Err(e) => return VerifyResult::remote_error(e),
    };

    if !response.status().is_success() {
        return VerifyResult::remote_error(format!("http status {}", response.status()));
    }

    match response.json::<VerifyResult>().await {
        Ok(result) => result,
        Err(e) => VerifyResult::remote_error(e),
    }
}
