use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("interpreter not ready: {0}")]
    NotReady(String),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
