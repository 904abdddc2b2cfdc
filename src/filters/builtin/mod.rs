//! Built-in nodes.
//!
//! The seamless texture node and its companions.

mod aspect;
mod display;
mod multi;
mod switch;
mod texture;

use crate::core::notify::NotificationSink;
use crate::filters::registry::NodeRegistry;
use std::sync::Arc;

/// Register all built-in nodes. Nodes that report status use `sink`.
pub fn register_all(registry: &mut NodeRegistry, sink: Arc<dyn NotificationSink>) {
    texture::register(registry);
    switch::register(registry, sink);
    aspect::register(registry);
    multi::register(registry);
    display::register(registry);
}

// Re-export for direct access
pub use aspect::{calculate_dimensions, AspectRatio, DimensionRequest, ASPECT_PRESETS};
pub use display::DisplayAny;
pub use multi::{combine_text, MultiFloat, MultiText};
pub use switch::AnySwitch;
pub use texture::SeamlessTexture;
