//! Thin transport binary: loads configuration, assembles the signing
//! key, ledger, and optional JWKS authenticator, and mounts the C7
//! dispatch table onto a real HTTP socket. No core semantics live here
//! -- every rule lives in the library crates this binary merely wires
//! together.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use attest_config::attest::{load_attest_config, AttestConfig};
use attest_crypto::commit::SecretKey;
use attest_crypto::sign::keystore::MemoryKeyTable;
use attest_jwks::cache::JwksCache;
use attest_ledger::InMemoryLedger;
use attest_service::facade::{JwksAuth, ServiceFacade};
use attest_service::http::router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "attestd exited with error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let overlay: Vec<PathBuf> = std::env::var("ATTEST_CONFIG_FILE")
        .ok()
        .map(|path| vec![PathBuf::from(path)])
        .unwrap_or_default();

    let config = load_attest_config(overlay).await?;
    let keystore = build_keystore(&config)?;
    let commit_key = SecretKey::from_prefixed(config.commitment_secret())?;
    let ledger = Arc::new(InMemoryLedger::new());
    let jwks = build_jwks_auth(&config);

    let facade = Arc::new(ServiceFacade::new(
        config.issuer.clone(),
        keystore,
        commit_key,
        config.ttl_default,
        ledger,
        jwks,
    ));

    let app = router(facade);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(%addr, issuer = %config.issuer, "attestd listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("attestd drained in-flight requests and shut down");
    Ok(())
}

/// Ed25519 signing-key lifecycle: a fixed base64-encoded
/// keypair in any mode, else a `KEY_PATH` file (generated and persisted
/// with mode 0600 only when `ENV=development`), else `CONFIG_MISSING`.
fn build_keystore(config: &AttestConfig) -> Result<MemoryKeyTable, Box<dyn std::error::Error>> {
    use base64::engine::general_purpose::STANDARD as b64_standard;
    use base64::Engine as _;

    if let (Some(sk_b64), Some(_vk_b64)) = (&config.ed25519_sk_b64, &config.ed25519_vk_b64) {
        let sk_bytes = b64_standard.decode(sk_b64)?;
        let sk_bytes: [u8; 32] = sk_bytes
            .try_into()
            .map_err(|_| "ED25519_SK_B64 must decode to exactly 32 bytes")?;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&sk_bytes);
        return Ok(MemoryKeyTable::from_signing_key(signing_key));
    }

    if let Some(key_path) = &config.key_path {
        return Ok(MemoryKeyTable::load_or_generate(
            key_path,
            config.env.allows_ephemeral_keys(),
        )?);
    }

    if config.env.allows_ephemeral_keys() {
        return Ok(MemoryKeyTable::generate());
    }

    Err("no signing key configured: set KEY_PATH or ED25519_SK_B64/ED25519_VK_B64".into())
}

fn build_jwks_auth(config: &AttestConfig) -> Option<Arc<JwksAuth>> {
    let domain = config.auth0_domain.clone()?;
    let audience = config.auth0_audience.clone()?;
    Some(Arc::new(JwksAuth {
        cache: JwksCache::new(domain.clone()),
        audience,
        issuer: format!("https://{domain}/"),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
