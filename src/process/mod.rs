//! Interpreter process management (readiness check, spawn, output capture).

use std::{collections::BTreeMap, fs, path::Path};

use async_trait::async_trait;

use crate::RunnerError;

pub mod interpreter;

pub use interpreter::TokioSpawner;

/// Everything one child process produced, decoded as (lossy) UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Starts a child from an argument vector and waits for it to finish.
///
/// `argv[0]` is the program. The child sees exactly `env`, nothing inherited.
#[async_trait]
pub trait Spawner: Send + Sync {
    async fn spawn(
        &self,
        argv: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<ProcessOutput, RunnerError>;
}

/// True iff `path` is an existing regular file that can be opened for reading.
///
/// Says nothing about whether the file is executable.
pub fn verify(path: &Path) -> bool {
    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    is_file && fs::File::open(path).is_ok()
}
