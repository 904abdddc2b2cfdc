//! # Seamweave - seamless texture tiles
//!
//! Seamweave turns an ordinary photo or render into a square tile whose
//! opposite edges meet without a visible seam. It also ships a handful of
//! small companion nodes for node-based image generation hosts.
//!
//! ## Features
//!
//! - **Tiling pipeline**: pre-processing, seam construction (simple blend,
//!   mirror, rotate), post-processing and resizing in one call
//! - **Node contract**: every operation is a [`FilterNode`] with declared
//!   ports, typed parameters and constraints
//! - **Companion nodes**: a typed switch, an aspect ratio calculator,
//!   multi-value helpers and a value display
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seamweave::prelude::*;
//!
//! let image = seamweave::core::buffer::load("bricks.jpg")?;
//! let tiler = TextureTiler::new(TilerParams {
//!     tile_size: 1024,
//!     overlap: 96,
//!     ..TilerParams::default()
//! })?;
//! let output = tiler.run(&image)?;
//! seamweave::core::buffer::save(&output.tile, "bricks_tile.png")?;
//! # Ok::<(), seamweave::core::SeamweaveError>(())
//! ```
//!
//! The same pipeline as a node:
//!
//! ```rust,no_run
//! use seamweave::prelude::*;
//! use std::collections::HashMap;
//!
//! let registry = NodeRegistry::with_builtins();
//! let node = registry.create("seamless_texture").unwrap();
//! let image = seamweave::core::buffer::load("bricks.jpg")?;
//! let outputs = invoke(
//!     node.as_ref(),
//!     HashMap::from([("image".to_string(), Value::from(image))]),
//!     HashMap::from([("pattern_type".to_string(), Value::String("mirror".to_string()))]),
//! )?;
//! assert!(outputs.contains_key("tile"));
//! # Ok::<(), seamweave::core::SeamweaveError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: buffers, values, ports, the node trait, errors and contexts
//! - [`imaging`]: blur, edge detection, Lab conversion and CLAHE
//! - [`texture`]: the tiling pipeline
//! - [`filters`]: the node registry and built-in nodes
//! - [`config`]: parameter files
//! - [`cli`]: the `seamweave` command line

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod core;
pub mod filters;
pub mod imaging;
pub mod texture;

pub use crate::core::node::FilterNode;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use seamweave::prelude::*;
/// ```
pub mod prelude {
    // Buffers and values
    pub use crate::core::buffer::{MaskBuffer, RgbBuffer};
    pub use crate::core::types::{ImageMetadata, ImageValue, PortType, Value};

    // Node traits and types
    pub use crate::core::node::{invoke, Category, FilterNode, NodeMetadata};
    pub use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};
    pub use crate::core::context::{ExecutionContext, ValidationContext};
    pub use crate::core::notify::{LogSink, MemorySink, NotificationSink};

    // Errors
    pub use crate::core::error::{
        BufferError, ConfigError, ExecutionError, NodeId, SeamweaveError, TilerError,
        ValidationError,
    };

    // Tiling
    pub use crate::texture::{
        Interpolation, PatternType, TextureDirection, TextureTiler, TileOutput, TilerParams,
    };

    // Nodes
    pub use crate::filters::registry::{NodeFactory, NodeRegistry, RegistryEntry};
    pub use crate::filters::builtin::{
        AnySwitch, AspectRatio, DisplayAny, MultiFloat, MultiText, SeamlessTexture,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
