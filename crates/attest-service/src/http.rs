use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::facade::{IssueRequest, RevokeRequest, ServiceFacade, VerifyRequest};

const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Clone)]
pub struct AppState {
    facade: Arc<ServiceFacade>,
}

impl AppState {
    pub fn new(facade: Arc<ServiceFacade>) -> Self {
        Self { facade }
    }
}

/// Mounts the C7 dispatch table onto the external HTTP route table,
/// wrapped in a correlation-ID middleware and a per-request log line.
pub fn router(facade: Arc<ServiceFacade>) -> Router {
    let state = AppState::new(facade);
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/did", get(did_handler))
        .route("/issue", post(issue_handler))
        .route("/verify", post(verify_handler))
        .route("/revoke", post(revoke_handler))
        .layer(middleware::from_fn(log_requests))
        .layer(middleware::from_fn(correlation_id))
        .with_state(state)
}

async fn correlation_id(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    req.headers_mut().insert(
        CORRELATION_HEADER,
        HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("invalid")),
    );

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

async fn log_requests(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let correlation_id = req
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default();

    let started = Instant::now();
    let response = next.run(req).await;
    let elapsed_ms = started.elapsed().as_millis();
    let status = response.status();

    if status.is_success() {
        info!(%method, %path, %correlation_id, status = status.as_u16(), elapsed_ms, "request completed");
    } else if status.is_client_error() {
        warn!(%method, %path, %correlation_id, status = status.as_u16(), elapsed_ms, "request rejected");
    } else {
        error!(%method, %path, %correlation_id, status = status.as_u16(), elapsed_ms, "request failed");
    }

    response
}

async fn healthz_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn did_handler(State(state): State<AppState>) -> Json<Value> {
    let did = state.facade.did();
    Json(json!({ "did": did.did, "kid": did.kid, "alg": did.alg }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[instrument(skip_all, fields(sub = %req.sub))]
async fn issue_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<IssueRequest>,
) -> Result<Json<Value>, HttpError> {
    let token = bearer_token(&headers);
    let response = state.facade.issue(token, req).await?;
    Ok(Json(json!({
        "token": response.token,
        "kid": response.kid,
        "jti": response.jti,
        "exp": response.exp,
    })))
}

#[instrument(skip_all)]
async fn verify_handler(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Json<Value> {
    let response = state.facade.verify(req);
    Json(json!({
        "valid": response.valid,
        "sub": response.sub,
        "scope": response.scope,
        "org_id": response.org_id,
        "exp": response.exp,
        "kid": response.kid,
        "jti": response.jti,
        "reason": response.reason,
    }))
}

#[instrument(skip_all)]
async fn revoke_handler(
    State(state): State<AppState>,
    Json(req): Json<RevokeRequest>,
) -> Result<Json<Value>, HttpError> {
    let response = state.facade.revoke(req)?;
    Ok(Json(json!({ "ok": response.ok, "jti": response.jti })))
}

/// Translates a `ServiceError` into the public error envelope:
/// `{code, message, correlation_id?}` at the error's registered HTTP
/// status.
struct HttpError(ServiceError);

impl From<ServiceError> for HttpError {
    fn from(value: ServiceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let err = self.0.into_inner();
        let status = StatusCode::from_u16(err.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(err.to_public())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_crypto::commit::SecretKey;
    use attest_crypto::MemoryKeyTable;
    use attest_ledger::InMemoryLedger;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_facade() -> Arc<ServiceFacade> {
        Arc::new(ServiceFacade::new(
            "did:attest:test".into(),
            MemoryKeyTable::generate(),
            SecretKey::from_prefixed("raw:test-secret").unwrap(),
            300,
            Arc::new(InMemoryLedger::new()),
            None,
        ))
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let app = router(test_facade());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(CORRELATION_HEADER));
    }

    #[tokio::test]
    async fn issue_then_verify_round_trips() {
        let app = router(test_facade());
        let issue_body = json!({
            "sub": "agent-1",
            "scope": ["read"],
            "nonce": "nonce-1",
        })
        .to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/issue")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(issue_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let issued: Value = serde_json::from_slice(&bytes).unwrap();
        let token = issued["token"].as_str().unwrap().to_string();

        let verify_body = json!({ "token": token }).to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/verify")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(verify_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let verified: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(verified["valid"], json!(true));
        assert_eq!(verified["sub"], json!("agent-1"));
    }

    #[tokio::test]
    async fn revoke_requires_token_or_jti() {
        let app = router(test_facade());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/revoke")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(json!({}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn metrics_track_issuance_and_verify_outcomes() {
        let facade = test_facade();
        let app = router(facade.clone());

        let issue_body = json!({ "sub": "agent-1", "scope": ["read"], "nonce": "nonce-1" }).to_string();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/issue")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(issue_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let issued: Value = serde_json::from_slice(&bytes).unwrap();
        let token = issued["token"].as_str().unwrap().to_string();

        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/verify")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(json!({ "token": token }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/verify")
                .header("content-type", "application/json")
                .body(axum::body::Body::from(json!({ "token": "not-a-token" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

        let snapshot = facade.metrics();
        assert_eq!(snapshot.passports_issued, 1);
        assert_eq!(snapshot.verify_valid, 1);
        assert_eq!(snapshot.verify_tampered, 1);
    }
}
