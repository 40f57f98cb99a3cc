//! Unified error type for the math subsystem.
//!
//! Infix parsing failures and MathML structural failures both surface
//! through this type. MathML reading additionally reports every problem
//! into a [`DiagnosticSink`](crate::diagnostics::DiagnosticSink).
use thiserror::Error;

/// Main error type for sbml-math operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed infix formula text
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// XML tokenizer failure
    #[error("XML error at line {line}, column {column}: {message}")]
    Xml {
        message: String,
        line: usize,
        column: usize,
    },

    /// Operation not defined for the node's current representation
    #[error("operation not supported on {0} nodes")]
    InvalidOperation(&'static str),

    /// Child index out of range
    #[error("child index {index} out of range (node has {len} children)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Text encoding error
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl Error {
    /// Build a syntax error at a 1-based line/column position.
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    /// Line/column of the error, if it carries a position.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Syntax { line, column, .. } | Error::Xml { line, column, .. } => {
                Some((*line, *column))
            },
            _ => None,
        }
    }
}

/// Result type for sbml-math operations.
pub type Result<T> = std::result::Result<T, Error>;
