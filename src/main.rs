mod cli;

use std::{
    fs,
    io::{self, Read},
    process::ExitCode,
};

use action_runner::{
    config::{self, Config},
    printer::StdioSink,
    process::{self, TokioSpawner},
    ActionRunner, Request,
};
use anyhow::{bail, Context, Result};
use cli::{Command, InterpreterArgs, RunArgs};
use is_terminal::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();
    let mut cfg = Config::load();

    // Operator logs go to stderr so stdout stays reserved for the action's output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(cfg.log_filter()).unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match args.command {
        Command::Run(run) => run_action(&mut cfg, run).await,
        Command::Verify(interp) => Ok(verify(&mut cfg, &interp)),
        Command::Config => {
            if cfg.rc_exists() {
                println!("# {}", cfg.config_path.display());
            } else {
                println!("# {} (not found, using defaults)", cfg.config_path.display());
            }
            for (k, v) in cfg.entries() {
                println!("{}={}", k, v);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_interpreter(cfg: &mut Config, args: &InterpreterArgs) {
    if let Some(binary) = &args.binary {
        cfg.set(config::BINARY_KEY, binary.to_string_lossy());
    }
}

fn verify(cfg: &mut Config, args: &InterpreterArgs) -> ExitCode {
    apply_interpreter(cfg, args);
    if process::verify(&cfg.binary_path()) {
        println!("ready");
        ExitCode::SUCCESS
    } else {
        println!("not ready: {}", cfg.binary_path().display());
        ExitCode::FAILURE
    }
}

async fn run_action(cfg: &mut Config, args: RunArgs) -> Result<ExitCode> {
    apply_interpreter(cfg, &args.interpreter);
    if let Some(script) = &args.script {
        cfg.set(config::SCRIPT_KEY, script.to_string_lossy());
    }
    if let Some(var) = &args.input_var {
        cfg.set(config::INPUT_VAR_KEY, var.clone());
    }

    let text = match &args.request {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading request file: {}", path.display()))?,
        None => {
            if io::stdin().is_terminal() {
                bail!("no request: pipe a JSON object on stdin or pass --request");
            }
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        }
    };
    let request = Request::from_json(&text)?;

    let runner = ActionRunner::from_config(cfg, TokioSpawner, StdioSink);
    tracing::debug!(binary = %runner.binary().display(), "running action");
    let envelope = runner.run(&request).await;

    println!("{}", serde_json::to_string(&envelope)?);
    Ok(if envelope.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
