#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CorrelationId(pub String);

impl Id {
    #[cfg(feature = "uuid")]
    pub fn new_random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[cfg(not(feature = "uuid"))]
    pub fn new_random() -> Self {
        Self(format!("id_{}", nanoid::nanoid!()))
    }
}

impl CorrelationId {
    pub fn new_random() -> Self {
        Self(format!("corr_{}", nanoid::nanoid!()))
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
