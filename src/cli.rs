use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "action-runner", about = "Run an action through an external interpreter", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read one request, run the action, print the result envelope as the last line.
    Run(RunArgs),
    /// Check that the interpreter binary exists and is readable.
    Verify(InterpreterArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InterpreterArgs {
    /// Interpreter binary (overrides ACTION_RUNNER_BINARY).
    #[arg(long)]
    pub binary: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub interpreter: InterpreterArgs,

    /// Entry script passed to the interpreter (overrides ACTION_RUNNER_SCRIPT).
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Environment variable that receives the serialized input (overrides ACTION_RUNNER_INPUT_VAR).
    #[arg(long = "input-var")]
    pub input_var: Option<String>,

    /// Read the request from this file instead of stdin.
    #[arg(long)]
    pub request: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
