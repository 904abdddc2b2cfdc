//! Error types for Seamweave.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Name the node and the port/parameter involved where one exists
//! - Fail fast: nothing here is transient, so nothing is retried

use crate::core::types::PortType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a node instance.
///
/// Hosts assign one per node in their graph; it only shows up in error
/// messages here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for Seamweave.
#[derive(Error, Debug)]
pub enum SeamweaveError {
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Tiler error: {0}")]
    Tiler(#[from] TilerError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors raised when a raw sample array cannot be read as an RGB buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferError {
    #[error("Unexpected image shape {shape:?}: expected (H, W, 3) or (3, H, W)")]
    InvalidShape { shape: Vec<usize> },

    #[error("Shape {shape:?} needs {expected} samples, got {actual}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Errors from the texture tiling pipeline.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TilerError {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },
}

/// Errors from the validation phase of a node.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: PortType, got: PortType },

    #[error("Missing required input '{port}' on node {node_id}")]
    MissingRequiredInput { node_id: NodeId, port: String },

    #[error("Constraint violation on node {node_id}, parameter '{parameter}': {error}")]
    ConstraintViolation {
        node_id: NodeId,
        parameter: String,
        error: String,
    },

    #[error("Custom validation failed on node {node_id}: {error}")]
    CustomValidation { node_id: NodeId, error: String },
}

/// Errors during node execution.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Node {node_id} execution failed: {error}")]
    NodeExecution { node_id: NodeId, error: String },

    #[error("Missing input '{port}' for node {node_id}")]
    MissingInput { node_id: NodeId, port: String },

    #[error("Missing parameter '{parameter}' for node {node_id}")]
    MissingParameter { node_id: NodeId, parameter: String },

    #[error("Output '{port}' was not set by node {node_id}")]
    OutputNotSet { node_id: NodeId, port: String },

    #[error("Tiling failed: {0}")]
    Tiler(#[from] TilerError),
}

/// Errors while loading a parameter file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML parameters: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported parameter file extension '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ValidationError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ValidationError::TypeMismatch { expected, got } => {
                Some(format!("Provide a {} value instead of {}", expected, got))
            }
            ValidationError::MissingRequiredInput { port, .. } => {
                Some(format!("Connect an output to the '{}' input", port))
            }
            ValidationError::ConstraintViolation { parameter, error, .. } => {
                Some(format!("Adjust '{}': {}", parameter, error))
            }
            _ => None,
        }
    }

    /// Get the node ID this error refers to, if any.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            ValidationError::MissingRequiredInput { node_id, .. }
            | ValidationError::ConstraintViolation { node_id, .. }
            | ValidationError::CustomValidation { node_id, .. } => Some(*node_id),
            _ => None,
        }
    }
}

impl ExecutionError {
    /// Get the node ID that caused this error, if applicable.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            ExecutionError::NodeExecution { node_id, .. }
            | ExecutionError::MissingInput { node_id, .. }
            | ExecutionError::MissingParameter { node_id, .. }
            | ExecutionError::OutputNotSet { node_id, .. } => Some(*node_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        let id = NodeId::new();
        let display = format!("{}", id);
        assert_eq!(display.len(), 8);
    }

    #[test]
    fn test_validation_error_suggestions() {
        let error = ValidationError::MissingRequiredInput {
            node_id: NodeId::new(),
            port: "image".to_string(),
        };
        assert!(error.suggested_fix().is_some());
        assert!(error.suggested_fix().unwrap().contains("image"));
        assert!(error.node_id().is_some());
    }

    #[test]
    fn test_buffer_error_message() {
        let error = BufferError::InvalidShape { shape: vec![4, 4, 2] };
        assert!(error.to_string().contains("[4, 4, 2]"));
    }

    #[test]
    fn test_tiler_error_wraps_buffer_error() {
        let error: TilerError = BufferError::Empty { width: 0, height: 3 }.into();
        assert_eq!(error.to_string(), "Image has no pixels (0x3)");

        let top: SeamweaveError = error.into();
        assert!(matches!(top, SeamweaveError::Tiler(_)));
    }

    #[test]
    fn test_execution_error_node_id() {
        let id = NodeId::new();
        let error = ExecutionError::MissingInput {
            node_id: id,
            port: "image".to_string(),
        };
        assert_eq!(error.node_id(), Some(id));
        let error: ExecutionError = TilerError::InvalidParameter {
            parameter: "tile_size".to_string(),
            reason: "must be positive".to_string(),
        }
        .into();
        assert_eq!(error.node_id(), None);
    }
}
