use attest_config::access;
use attest_config::errors::schema_invalid;
use attest_config::prelude::*;
use attest_config::source::{env::EnvSource, file::FileSource};
use std::sync::Arc;

#[test]
fn load_minimal_snapshot_and_read() {
    std::env::set_var("ATTEST_TEST_APP_NAME", "attestd");
    let loader = Loader {
        sources: vec![
            Arc::new(FileSource { paths: vec![] }) as Arc<dyn Source>,
            Arc::new(EnvSource {
                prefix: "ATTEST_TEST_".into(),
                separator: "_".into(),
            }) as Arc<dyn Source>,
        ],
        secrets: vec![Arc::new(NoopSecretResolver) as Arc<dyn SecretResolver>],
        validator: Arc::new(BasicValidator),
        registry: Arc::new(InMemorySchemaRegistry::new()),
    };

    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let snapshot = runtime
        .block_on(async { loader.load_once().await })
        .expect("snapshot");

    let app_name: String = snapshot.get(&KeyPath("app.name".into())).expect("app.name");
    assert_eq!(app_name, "attestd");
    assert!(!snapshot.checksum().0.is_empty());
    std::env::remove_var("ATTEST_TEST_APP_NAME");
}

struct StaticSource;

#[async_trait::async_trait]
impl Source for StaticSource {
    fn id(&self) -> &'static str {
        "static"
    }

    async fn load(&self) -> Result<SourceSnapshot, ConfigError> {
        let mut map = serde_json::Map::new();
        access::set_path(
            &mut map,
            "secrets.key",
            serde_json::Value::String("secret://named/demo".into()),
        );
        access::set_path(
            &mut map,
            "secrets.auto",
            serde_json::Value::String("secret://value".into()),
        );
        Ok(SourceSnapshot {
            map,
            provenance: Vec::new(),
        })
    }
}

struct FailingResolver;

#[async_trait::async_trait]
impl SecretResolver for FailingResolver {
    fn id(&self) -> &'static str {
        "fail"
    }

    async fn resolve(&self, _uri: &str) -> Result<serde_json::Value, ConfigError> {
        Err(schema_invalid("test", "forced failure"))
    }
}

struct NamedResolver;

#[async_trait::async_trait]
impl SecretResolver for NamedResolver {
    fn id(&self) -> &'static str {
        "named"
    }

    async fn resolve(&self, uri: &str) -> Result<serde_json::Value, ConfigError> {
        if uri.starts_with("secret://named/") {
            Ok(serde_json::Value::String(format!("resolved::{uri}")))
        } else {
            Err(schema_invalid("test", "named resolver skipped"))
        }
    }
}

struct DefaultResolver;

#[async_trait::async_trait]
impl SecretResolver for DefaultResolver {
    fn id(&self) -> &'static str {
        "default"
    }

    async fn resolve(&self, uri: &str) -> Result<serde_json::Value, ConfigError> {
        Ok(serde_json::Value::String(format!("fallback::{uri}")))
    }
}

#[test]
fn resolves_secrets_with_hints_and_fallback() {
    let loader = Loader {
        sources: vec![Arc::new(StaticSource) as Arc<dyn Source>],
        secrets: vec![
            Arc::new(FailingResolver) as Arc<dyn SecretResolver>,
            Arc::new(NamedResolver) as Arc<dyn SecretResolver>,
            Arc::new(DefaultResolver) as Arc<dyn SecretResolver>,
        ],
        validator: Arc::new(BasicValidator),
        registry: Arc::new(InMemorySchemaRegistry::new()),
    };

    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let snapshot = runtime
        .block_on(async { loader.load_once().await })
        .expect("snapshot");

    let named: String = snapshot
        .get(&KeyPath("secrets.key".into()))
        .expect("named secret");
    assert_eq!(named, "resolved::secret://named/demo");

    let fallback: String = snapshot
        .get(&KeyPath("secrets.auto".into()))
        .expect("auto secret");
    assert_eq!(fallback, "fallback::secret://value");
}

fn clear_attest_env() {
    for key in [
        "ISSUER",
        "HOST",
        "PORT",
        "SQLITE_PATH",
        "METRICS_SECRET",
        "TTL_DEFAULT",
        "KEY_PATH",
        "AUTH0_DOMAIN",
        "AUTH0_AUDIENCE",
        "COMMIT_KEY",
        "ED25519_SK_B64",
        "ED25519_VK_B64",
        "ENV",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn development_env_allows_ephemeral_keys() {
    clear_attest_env();
    std::env::set_var("ISSUER", "attest-svc");
    std::env::set_var("SQLITE_PATH", "attest.db");
    std::env::set_var("METRICS_SECRET", "raw:dev-secret");
    std::env::set_var("ENV", "development");

    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let config = runtime
        .block_on(attest_config::attest::load_attest_config(vec![]))
        .expect("config");

    assert_eq!(config.issuer, "attest-svc");
    assert_eq!(config.port, 8080);
    assert_eq!(config.ttl_default, 300);
    assert!(!config.has_static_signing_material());
    clear_attest_env();
}

#[test]
fn non_development_env_without_signing_material_is_rejected() {
    clear_attest_env();
    std::env::set_var("ISSUER", "attest-svc");
    std::env::set_var("SQLITE_PATH", "attest.db");
    std::env::set_var("METRICS_SECRET", "raw:prod-secret");
    std::env::set_var("ENV", "production");

    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let result = runtime.block_on(attest_config::attest::load_attest_config(vec![]));
    assert!(result.is_err());
    clear_attest_env();
}
