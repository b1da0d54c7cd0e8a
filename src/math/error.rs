// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Unknown region tag '{tag}'")]
    UnknownTag { tag: String },

    #[error("Invalid expression: {message}")]
    InvalidExpression { message: String },

    #[error("Expression '{expression}' evaluated to an empty region")]
    EmptyResult { expression: String },

    #[error("Empty domain: {reason}")]
    EmptyDomain { reason: String },

    #[error("Triangulation failed: {reason}")]
    TriangulationFailed { reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid region tag '{tag}': tags must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidTag { tag: String },

    #[error("Region tag '{tag}' is already in use")]
    DuplicateTag { tag: String },

    #[error("Export failed: {message}")]
    Export { message: String },
}

impl MathError {
    /// Kurzform für Syntaxfehler mit Position.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        MathError::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub fn triangulation(reason: impl Into<String>) -> Self {
        MathError::TriangulationFailed {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        MathError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

pub type MathResult<T> = Result<T, MathError>;
