//! Node implementations.
//!
//! Contains the node registry and the built-in nodes.

pub mod builtin;
pub mod registry;

pub use registry::{NodeFactory, NodeRegistry};
