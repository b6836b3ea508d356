//! Error types for the compiler bridge.

use std::io;

/// The Faust compiler failed or faulted while translating a DSP program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A JSON UI descriptor could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid descriptor JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("descriptor is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("malformed UI node: {0}")]
    InvalidNode(String),
}

/// Top-level errors surfaced by the CLI and the transport session.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("compile failed: {0}")]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
