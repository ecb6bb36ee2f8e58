pub use crate::{
    attest::{load_attest_config, AttestConfig, DeployEnv},
    errors::ConfigError,
    loader::Loader,
    model::{Checksum, KeyPath, NamespaceId, ReloadClass, SnapshotVersion},
    schema::{FieldMeta, InMemorySchemaRegistry, SchemaRegistry},
    secrets::{NoopSecretResolver, SecretResolver},
    snapshot::ConfigSnapshot,
    source::{Source, SourceSnapshot},
    validate::{BasicValidator, Validator},
};
