//! Error taxonomy shared by the library.

use thiserror::Error;

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, StructError>;

/// Errors that make a single instance fail. None of them aborts a batch.
#[derive(Error, Debug)]
pub enum StructError {
    /// Malformed instance file.
    #[error("parse error in {path} (line {line}): {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    /// A bound heuristic could not produce a value.
    #[error("{algorithm} failed: {message}")]
    Algorithm {
        algorithm: &'static str,
        message: String,
    },

    /// Invalid analysis configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StructError {
    pub fn parse(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn algorithm(algorithm: &'static str, message: impl Into<String>) -> Self {
        Self::Algorithm {
            algorithm,
            message: message.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
