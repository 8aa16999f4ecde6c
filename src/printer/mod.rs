//! Diagnostic sinks: where forwarded child output and failure notes end up.

use std::{
    io::{self, Write},
    sync::Mutex,
};

/// Receives diagnostics verbatim. `log` is the invocation's stdout, `error` its stderr.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, text: &str);
    fn error(&self, text: &str);
}

/// Writes straight to this process's stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink;

impl DiagnosticSink for StdioSink {
    fn log(&self, text: &str) {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes()).ok();
        out.flush().ok();
    }

    fn error(&self, text: &str) {
        let mut err = io::stderr().lock();
        err.write_all(text.as_bytes()).ok();
        err.flush().ok();
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    log: Mutex<String>,
    error: Mutex<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged(&self) -> String {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn errored(&self) -> String {
        self.error.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn log(&self, text: &str) {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_str(text);
    }

    fn error(&self, text: &str) {
        self.error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_str(text);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<T> {
    fn log(&self, text: &str) {
        (**self).log(text)
    }

    fn error(&self, text: &str) {
        (**self).error(text)
    }
}
