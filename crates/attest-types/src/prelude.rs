pub use crate::{
    id::{CorrelationId, Id},
    time::Timestamp,
    trace::TraceContext,
};
