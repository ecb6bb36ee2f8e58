use crate::{
    errors::ConfigError,
    model::{ConfigMap, ProvenanceEntry},
};
use async_trait::async_trait;

pub mod env;
pub mod file;

#[derive(Clone, Debug)]
pub struct SourceSnapshot {
    pub map: ConfigMap,
    pub provenance: Vec<ProvenanceEntry>,
}

#[async_trait]
pub trait Source: Send + Sync {
    fn id(&self) -> &'static str;
    async fn load(&self) -> Result<SourceSnapshot, ConfigError>;
}
