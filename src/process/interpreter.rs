//! Real child processes via `tokio::process`.

use std::{collections::BTreeMap, process::Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use super::{ProcessOutput, Spawner};
use crate::RunnerError;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

#[async_trait]
impl Spawner for TokioSpawner {
    async fn spawn(
        &self,
        argv: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<ProcessOutput, RunnerError> {
        let (program, args) = argv.split_first().ok_or_else(|| RunnerError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argument vector"),
        })?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env_clear()
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            program: program.clone(),
            source,
        })?;
        tracing::debug!(program = %program, pid = ?child.id(), "interpreter started");

        // No deadline: a hung child hangs the invocation.
        let out = child.wait_with_output().await?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            exit_code: out.status.code(),
        })
    }
}
