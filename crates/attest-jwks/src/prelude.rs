pub use crate::cache::JwksCache;
pub use crate::claims::{check_scopes, AudienceClaim, ExternalClaims};
pub use crate::errors::JwksError;
pub use crate::metrics::{JwksMetrics, JwksMetricsSnapshot};
pub use crate::verify::verify_external_jwt;
