//! Display Any: render whatever arrives as text.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::PortDefinition;
use crate::core::types::{PortType, Value};
use crate::filters::registry::NodeRegistry;

pub fn register(registry: &mut NodeRegistry) {
    registry.register(|| Box::new(DisplayAny));
}

/// Text form of a value: `None`, JSON, or `Image(WxH)` for a bare image.
///
/// The JSON is compact `serde_json` output. Non-ASCII text is written as
/// raw UTF-8 rather than `\u` escapes, and non-finite floats become `null`.
pub fn render(value: &Value) -> String {
    match value {
        Value::None => "None".to_string(),
        Value::Image(_) => value.to_string(),
        other => other.to_json().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct DisplayAny;

impl FilterNode for DisplayAny {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("display_any", "Display Any")
            .description("Show any value as text")
            .category(Category::Utility)
            .tags(["display", "debug", "inspect"])
            .input(
                PortDefinition::input("source", PortType::Any)
                    .optional()
                    .with_description("Value to display"),
            )
            .output(PortDefinition::output("text", PortType::String))
            .build()
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationError> {
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let text = render(ctx.get_input_or_none("source"));
        log::info!("display_any: {}", text);
        ctx.set_output("text", Value::String(text))
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}
