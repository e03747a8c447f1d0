//! Transpiler errors
//!
//! Backends report what they cannot express with [Unsupported]; the driver turns that into
//! [TranspileError::UnsupportedFeature], naming the opcode being emitted and the target.

use photon_parser::photon::ast::ParseError;
use thiserror::Error;

/// A construct the backend cannot represent in its target language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{feature}")]
pub struct Unsupported {
    pub feature: String,
}

impl Unsupported {
    pub fn new(feature: impl Into<String>) -> Self {
        Unsupported {
            feature: feature.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranspileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The driver and the grammar disagree about the shape of the tree.
    #[error("InternalError: {message}")]
    Internal { message: String },
    #[error("UnsupportedFeatureError: {feature} (`{opcode}` is not supported by the {target} target)")]
    UnsupportedFeature {
        feature: String,
        opcode: String,
        target: String,
    },
    #[error("target '{0}' not found")]
    TargetNotFound(String),
    #[error("import cycle: {}", .0.join(" -> "))]
    ImportCycle(Vec<String>),
    #[error("failed to write {path}: {message}")]
    Io { path: String, message: String },
}

impl TranspileError {
    pub fn internal(message: impl Into<String>) -> Self {
        TranspileError::Internal {
            message: message.into(),
        }
    }
}
