use crate::{
    errors::{schema_invalid, ConfigError},
    loader::Loader,
    schema::{InMemorySchemaRegistry, SchemaRegistry},
    secrets::NoopSecretResolver,
    source::{env::EnvSource, file::FileSource, Source},
    validate::{BasicValidator, Validator},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Deployment mode gate for `ENV`. Anything other than `Development`
/// requires real signing material and rejects ephemeral key generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployEnv {
    Development,
    Staging,
    Production,
}

impl DeployEnv {
    pub fn allows_ephemeral_keys(self) -> bool {
        matches!(self, DeployEnv::Development)
    }
}

impl Default for DeployEnv {
    fn default() -> Self {
        DeployEnv::Production
    }
}

/// The recognized configuration surface for the attestation service,
/// loaded env-first with an optional file overlay for local
/// development.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttestConfig {
    pub issuer: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub sqlite_path: String,
    pub metrics_secret: String,
    #[serde(default = "default_ttl")]
    pub ttl_default: i64,
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    #[serde(default)]
    pub auth0_domain: Option<String>,
    #[serde(default)]
    pub auth0_audience: Option<String>,
    #[serde(default)]
    pub commit_key: Option<String>,
    #[serde(default)]
    pub ed25519_sk_b64: Option<String>,
    #[serde(default)]
    pub ed25519_vk_b64: Option<String>,
    #[serde(default)]
    pub env: DeployEnv,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_ttl() -> i64 {
    300
}

impl AttestConfig {
    /// The HMAC key for passport commitments: `COMMIT_KEY` if present,
    /// falling back to `METRICS_SECRET` since both keys serve the same
    /// purpose.
    pub fn commitment_secret(&self) -> &str {
        self.commit_key.as_deref().unwrap_or(&self.metrics_secret)
    }

    pub fn has_static_signing_material(&self) -> bool {
        self.key_path.is_some() || (self.ed25519_sk_b64.is_some() && self.ed25519_vk_b64.is_some())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.trim().is_empty() {
            return Err(schema_invalid("attest_config", "ISSUER must not be empty"));
        }
        if !self.env.allows_ephemeral_keys() && !self.has_static_signing_material() {
            return Err(schema_invalid(
                "attest_config",
                "non-development ENV requires KEY_PATH or ED25519_SK_B64/ED25519_VK_B64",
            ));
        }
        Ok(())
    }
}

/// Loads `AttestConfig` from the process environment (`ATTEST__` prefixed,
/// `__` separated, bare key names lower-cased), with an optional file
/// overlay for local development, then validates it.
pub async fn load_attest_config(overlay_paths: Vec<PathBuf>) -> Result<AttestConfig, ConfigError> {
    let loader = Loader {
        sources: vec![
            Arc::new(FileSource {
                paths: overlay_paths,
            }) as Arc<dyn Source>,
            Arc::new(EnvSource {
                prefix: "".into(),
                separator: "__".into(),
            }) as Arc<dyn Source>,
        ],
        secrets: vec![Arc::new(NoopSecretResolver)],
        validator: Arc::new(BasicValidator),
        registry: Arc::new(InMemorySchemaRegistry::new()) as Arc<dyn SchemaRegistry>,
    };

    let snapshot = loader.load_once().await?;
    let tree = snapshot.tree().clone();
    let config: AttestConfig = serde_json::from_value(remap_keys(tree))
        .map_err(|e| schema_invalid("attest_config", &e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Source keys arrive lower-cased by `EnvSource` (`ISSUER` -> `issuer`);
/// `AttestConfig`'s fields already match that casing, so this is the
/// identity map today. Kept as a seam so a future alias (e.g. `DB_URL`
/// as a synonym for `SQLITE_PATH`) has one place to land.
fn remap_keys(tree: serde_json::Value) -> serde_json::Value {
    tree
}
