pub mod code;
pub mod kind;
pub mod labels;
pub mod model;
pub mod prelude;
pub mod render;
pub mod retry;
pub mod severity;
pub mod wrap;

#[cfg(feature = "http")]
pub mod mapping_http;

#[cfg(feature = "grpc")]
pub mod mapping_grpc;
