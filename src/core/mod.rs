//! Core types and traits shared by every node.
//!
//! This module contains the foundational pieces:
//! - Image buffers and the raw-array adapters
//! - Value types passed between nodes
//! - Port definitions and constraints
//! - Node traits, metadata and the single-call driver
//! - Error types
//! - Execution and validation contexts
//! - Notification sinks

pub mod buffer;
pub mod types;
pub mod port;
pub mod error;
pub mod context;
pub mod node;
pub mod notify;

// Re-export commonly used types
pub use buffer::{MaskBuffer, RgbBuffer};
pub use types::{Value, PortType, ImageValue, ImageMetadata};
pub use port::{PortDefinition, PortDirection, ParameterDefinition, Constraint, UiHint};
pub use error::{
    BufferError, ConfigError, ExecutionError, NodeId, SeamweaveError, TilerError, ValidationError,
};
pub use context::{ValidationContext, ExecutionContext};
pub use node::{invoke, Category, FilterNode, NodeMetadata};
pub use notify::{LogSink, MemorySink, NotificationSink};
