//! One invocation end to end: readiness gate, spawn, demultiplex, classify.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde_json::Value;

use super::{classify, split_last_line, Classification, ResultEnvelope};
use crate::{
    config::Config,
    printer::DiagnosticSink,
    process::{self, Spawner},
    request::{build_env, inherited_env, Request},
    RunnerError,
};

pub struct ActionRunner<S, D> {
    binary: PathBuf,
    script: PathBuf,
    input_var: String,
    spawner: S,
    sink: D,
}

impl<S: Spawner, D: DiagnosticSink> ActionRunner<S, D> {
    pub fn new(
        binary: impl Into<PathBuf>,
        script: impl Into<PathBuf>,
        input_var: impl Into<String>,
        spawner: S,
        sink: D,
    ) -> Self {
        Self {
            binary: binary.into(),
            script: script.into(),
            input_var: input_var.into(),
            spawner,
            sink,
        }
    }

    pub fn from_config(cfg: &Config, spawner: S, sink: D) -> Self {
        Self::new(
            cfg.binary_path(),
            cfg.script_path(),
            cfg.input_var(),
            spawner,
            sink,
        )
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Advisory: a ready binary may still fail to run.
    pub fn verify(&self) -> bool {
        process::verify(&self.binary)
    }

    /// This process's environment plus the request-derived variables.
    pub fn env(&self, request: &Request) -> BTreeMap<String, String> {
        build_env(request, inherited_env(), &self.input_var)
    }

    pub fn argv(&self, args: &Value) -> Vec<String> {
        vec![
            self.binary.to_string_lossy().into_owned(),
            self.script.to_string_lossy().into_owned(),
            args.to_string(),
        ]
    }

    /// Readiness gate, then [`ActionRunner::execute`] on the request input.
    pub async fn run(&self, request: &Request) -> ResultEnvelope {
        if !self.verify() {
            let e = RunnerError::NotReady(self.binary.display().to_string());
            tracing::warn!(error = %e, "skipping invocation");
            return self.fail(&e.to_string());
        }
        let env = self.env(request);
        self.execute(&request.input(), &env).await
    }

    /// Runs the interpreter once. The child's exit code never affects the result.
    pub async fn execute(&self, args: &Value, env: &BTreeMap<String, String>) -> ResultEnvelope {
        let argv = self.argv(args);
        let output = match self.spawner.spawn(&argv, env).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "interpreter spawn failed");
                return self.fail(&e.to_string());
            }
        };
        tracing::debug!(
            exit_code = ?output.exit_code,
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "interpreter finished"
        );

        let (log, candidate) = split_last_line(&output.stdout);
        if !log.is_empty() {
            self.sink.log(log);
        }
        if !output.stderr.is_empty() {
            self.sink.error(&output.stderr);
        }

        match classify(candidate) {
            Classification::Success(payload) => ResultEnvelope::success(payload),
            other => {
                tracing::info!(kind = other.kind(), "action result rejected");
                self.fail(candidate)
            }
        }
    }

    fn fail(&self, diagnostic: &str) -> ResultEnvelope {
        self.sink.log(&format!("{}\n", diagnostic));
        ResultEnvelope::failure()
    }
}
