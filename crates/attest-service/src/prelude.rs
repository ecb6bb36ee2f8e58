pub use crate::errors::ServiceError;
pub use crate::facade::{
    DidResponse, IssueRequest, IssueResponse, JwksAuth, RevokeRequest, RevokeResponse,
    ServiceFacade, VerifyRequest, VerifyResponse,
};
pub use crate::http::{router, AppState};
pub use crate::metrics::{ServiceMetrics, ServiceMetricsSnapshot, VerifyOutcome};
