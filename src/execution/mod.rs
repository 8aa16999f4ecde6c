//! Execution engine: result envelope, log/result demultiplexing and the runner.

use serde::Serialize;
use serde_json::{Map, Value};

pub mod demux;
pub mod runner;

pub use demux::{classify, split_last_line, Classification};
pub use runner::ActionRunner;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_GATEWAY: u16 = 502;

pub const NOT_AN_OBJECT_MESSAGE: &str = "The action did not return a dictionary.";

/// The only artifact that outlives an invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub status: u16,
    pub payload: Map<String, Value>,
}

impl ResultEnvelope {
    pub fn success(payload: Map<String, Value>) -> Self {
        Self {
            status: STATUS_OK,
            payload,
        }
    }

    pub fn failure() -> Self {
        let mut payload = Map::new();
        payload.insert("error".into(), Value::String(NOT_AN_OBJECT_MESSAGE.into()));
        Self {
            status: STATUS_BAD_GATEWAY,
            payload,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}
