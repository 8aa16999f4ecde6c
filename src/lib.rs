//! Execution adapter: launches an interpreter on an action script, hands it the
//! request input, and separates the child's free-form logs from its JSON result.

pub mod config;
pub mod error;
pub mod execution;
pub mod printer;
pub mod process;
pub mod request;

pub use error::RunnerError;
pub use execution::{ActionRunner, Classification, ResultEnvelope};
pub use request::Request;
