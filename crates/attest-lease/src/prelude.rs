pub use crate::errors::LeaseError;
pub use crate::manager::{LeaseManager, ValidateOutcome};
pub use crate::metrics::{LeaseMetrics, LeaseMetricsSnapshot};
pub use crate::model::LeaseRecord;
