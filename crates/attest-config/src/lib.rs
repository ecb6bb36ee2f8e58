pub mod access;
pub mod attest;
pub mod errors;
pub mod loader;
pub mod model;
pub mod prelude;
pub mod schema;
pub mod secrets;
pub mod snapshot;
pub mod source;
pub mod validate;
