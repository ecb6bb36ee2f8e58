use std::time::Duration;

use attest_jwks::prelude::*;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, EncodingKey, Header};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUD: &str = "https://attest.example.test/";
const ISS: &str = "https://auth.example.test/";

struct TestKey {
    kid: &'static str,
    encoding_key: EncodingKey,
    jwk: serde_json::Value,
}

fn generate_key(kid: &'static str) -> TestKey {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, 2048).expect("rsa keygen");
    let public = private.to_public_key();

    let pem = private
        .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
        .expect("pkcs1 pem");
    let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("encoding key");

    let n = URL_SAFE_NO_PAD.encode(public.n().to_bytes_be());
    let e = URL_SAFE_NO_PAD.encode(public.e().to_bytes_be());

    let jwk = json!({
        "kty": "RSA",
        "use": "sig",
        "alg": "RS256",
        "kid": kid,
        "n": n,
        "e": e,
    });

    TestKey {
        kid,
        encoding_key,
        jwk,
    }
}

fn sign_token(key: &TestKey, claims: serde_json::Value) -> String {
    let mut header = Header::new(jsonwebtoken::Algorithm::RS256);
    header.kid = Some(key.kid.to_string());
    encode(&header, &claims, &key.encoding_key).expect("jwt encode")
}

fn default_claims(exp_offset: i64) -> serde_json::Value {
    let now = 1_700_000_000_i64;
    json!({
        "sub": "agent-123",
        "scope": "attest:issue attest:verify",
        "exp": now + exp_offset,
        "iat": now,
        "aud": AUD,
        "iss": ISS,
    })
}

async fn mock_jwks_server(jwks_body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body))
        .mount(&server)
        .await;
    server
}

fn cache_for(server: &MockServer) -> JwksCache {
    let url = format!("{}/.well-known/jwks.json", server.uri());
    JwksCache::from_url(url, Duration::from_secs(300), Duration::from_secs(5))
}

#[tokio::test]
async fn happy_path_verifies_rs256_token() {
    let key = generate_key("k1");
    let server = mock_jwks_server(json!({ "keys": [key.jwk.clone()] })).await;
    let cache = cache_for(&server);

    let token = sign_token(&key, default_claims(3600));
    let claims = verify_external_jwt(&cache, &token, AUD, ISS).await.unwrap();

    assert_eq!(claims.sub, "agent-123");
    assert!(claims.has_scopes(&["attest:issue"]));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let key = generate_key("k1");
    let server = mock_jwks_server(json!({ "keys": [key.jwk.clone()] })).await;
    let cache = cache_for(&server);

    let token = sign_token(&key, default_claims(-3600));
    let err = verify_external_jwt(&cache, &token, AUD, ISS).await.unwrap_err();
    assert_eq!(err.into_inner().code.0, "TOKEN_EXPIRED");
}

#[tokio::test]
async fn future_nbf_is_rejected() {
    let key = generate_key("k1");
    let server = mock_jwks_server(json!({ "keys": [key.jwk.clone()] })).await;
    let cache = cache_for(&server);

    let mut claims = default_claims(3600);
    claims["nbf"] = json!(claims["iat"].as_i64().unwrap() + 1800);
    let token = sign_token(&key, claims);

    let err = verify_external_jwt(&cache, &token, AUD, ISS).await.unwrap_err();
    assert_eq!(err.into_inner().code.0, "TOKEN_NOT_YET_VALID");
}

#[tokio::test]
async fn audience_mismatch_is_rejected() {
    let key = generate_key("k1");
    let server = mock_jwks_server(json!({ "keys": [key.jwk.clone()] })).await;
    let cache = cache_for(&server);

    let token = sign_token(&key, default_claims(3600));
    let err = verify_external_jwt(&cache, &token, "https://someone-else.test/", ISS)
        .await
        .unwrap_err();
    assert_eq!(err.into_inner().code.0, "AUDIENCE_MISMATCH");
}

#[tokio::test]
async fn issuer_mismatch_is_rejected() {
    let key = generate_key("k1");
    let server = mock_jwks_server(json!({ "keys": [key.jwk.clone()] })).await;
    let cache = cache_for(&server);

    let token = sign_token(&key, default_claims(3600));
    let err = verify_external_jwt(&cache, &token, AUD, "https://someone-else.test/")
        .await
        .unwrap_err();
    assert_eq!(err.into_inner().code.0, "ISSUER_MISMATCH");
}

#[tokio::test]
async fn unknown_kid_is_rejected() {
    let key = generate_key("k1");
    let other = generate_key("k2");
    let server = mock_jwks_server(json!({ "keys": [other.jwk.clone()] })).await;
    let cache = cache_for(&server);

    let token = sign_token(&key, default_claims(3600));
    let err = verify_external_jwt(&cache, &token, AUD, ISS).await.unwrap_err();
    assert_eq!(err.into_inner().code.0, "KID_UNKNOWN");
}

#[tokio::test]
async fn malformed_jwks_response_is_rejected_and_cache_stays_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not_keys": [] })))
        .mount(&server)
        .await;
    let cache = cache_for(&server);

    let err = cache.get_keys().await.unwrap_err();
    assert_eq!(err.into_inner().code.0, "JWKS_MALFORMED");
    assert!(cache.cache_age().await.is_none());
}

#[tokio::test]
async fn malformed_jwks_response_is_rejected_even_with_a_warm_stale_cache() {
    let key = generate_key("k1");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": [key.jwk.clone()] })))
        .mount(&server)
        .await;

    let cache = JwksCache::from_url(
        format!("{}/.well-known/jwks.json", server.uri()),
        Duration::from_millis(10),
        Duration::from_secs(5),
    );

    // Warm the cache with a valid response.
    cache.get_keys().await.unwrap();
    let warm_age = cache.cache_age().await;
    assert!(warm_age.is_some());

    // Let the TTL lapse, then swap in a structurally invalid response.
    tokio::time::sleep(Duration::from_millis(30)).await;
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not_keys": [] })))
        .mount(&server)
        .await;

    // A malformed response must fail outright, never silently fall back
    // to the still-present stale cache.
    let err = cache.get_keys().await.unwrap_err();
    assert_eq!(err.into_inner().code.0, "JWKS_MALFORMED");
}

#[tokio::test]
async fn stale_cache_is_served_with_warning_on_subsequent_network_failure() {
    let key = generate_key("k1");
    let server = mock_jwks_server(json!({ "keys": [key.jwk.clone()] })).await;

    let cache = JwksCache::from_url(
        format!("{}/.well-known/jwks.json", server.uri()),
        Duration::from_millis(10),
        Duration::from_secs(5),
    );

    // Warm the cache.
    cache.get_keys().await.unwrap();

    // Let the TTL lapse, then kill the server so the next refresh fails.
    tokio::time::sleep(Duration::from_millis(30)).await;
    drop(server);

    let keys = cache.get_keys().await.unwrap();
    assert_eq!(keys.keys.len(), 1);
}

#[tokio::test]
async fn metrics_track_hits_misses_and_stale_fallbacks() {
    let key = generate_key("k1");
    let server = mock_jwks_server(json!({ "keys": [key.jwk.clone()] })).await;

    let cache = JwksCache::from_url(
        format!("{}/.well-known/jwks.json", server.uri()),
        Duration::from_millis(10),
        Duration::from_secs(5),
    );

    // First call is a cold-cache miss.
    cache.get_keys().await.unwrap();
    // Second call, still within ttl, is a hit.
    cache.get_keys().await.unwrap();

    // Let the ttl lapse, then kill the server so the refresh falls back to stale.
    tokio::time::sleep(Duration::from_millis(30)).await;
    drop(server);
    cache.get_keys().await.unwrap();

    let snapshot = cache.metrics();
    assert_eq!(snapshot.miss, 1);
    assert_eq!(snapshot.hit, 1);
    assert_eq!(snapshot.stale_fallback, 1);
}

#[tokio::test]
async fn empty_cache_on_failure_returns_jwks_unavailable() {
    let server = MockServer::start().await;
    let url = format!("{}/.well-known/jwks.json", server.uri());
    drop(server);

    let cache = JwksCache::from_url(url, Duration::from_secs(300), Duration::from_millis(200));
    let err = cache.get_keys().await.unwrap_err();
    assert_eq!(err.into_inner().code.0, "JWKS_UNAVAILABLE");
}

#[test]
fn check_scopes_is_vacuously_true_when_nothing_is_needed() {
    let claims: attest_jwks::claims::ExternalClaims = serde_json::from_value(default_claims(3600))
        .expect("claims parse");
    assert!(check_scopes(&claims, &[]));
    assert!(!check_scopes(&claims, &["admin:root"]));
}
