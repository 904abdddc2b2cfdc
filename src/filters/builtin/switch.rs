//! Any Switch: route one of several loosely typed inputs to typed outputs.

use crate::core::buffer::RgbBuffer;
use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::notify::NotificationSink;
use crate::core::port::{ParameterDefinition, PortDefinition, UiHint};
use crate::core::types::{PortType, Value};
use crate::filters::registry::NodeRegistry;
use std::sync::Arc;

/// Number of input slots.
pub const SLOT_COUNT: usize = 5;

/// Side of the black image emitted when nothing routes to `image_output`.
const EMPTY_IMAGE_SIZE: u32 = 8;

/// Register the switch, reporting status to `sink`.
pub fn register(registry: &mut NodeRegistry, sink: Arc<dyn NotificationSink>) {
    registry.register(move || Box::new(AnySwitch::new(sink.clone())));
}

fn slot_name(index: usize) -> String {
    format!("input_{}", index)
}

/// Picks one of `input_1..input_5` and sends it to the output matching its
/// type. Slots are counted, not addressed: `select` is clamped to the number
/// of connected slots before the slot with that index is read.
#[derive(Debug, Clone)]
pub struct AnySwitch {
    sink: Arc<dyn NotificationSink>,
}

impl AnySwitch {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    fn notify(&self, message: &str) {
        self.sink.notify("any_switch", message);
    }

    fn set_outputs(
        ctx: &mut ExecutionContext,
        image: Option<Value>,
        text: &str,
        int: i64,
    ) -> Result<(), ExecutionError> {
        let image = image.unwrap_or_else(|| {
            RgbBuffer::new(EMPTY_IMAGE_SIZE, EMPTY_IMAGE_SIZE).into()
        });
        ctx.set_output("image_output", image)?;
        ctx.set_output("text_output", Value::String(text.to_string()))?;
        ctx.set_output("int_output", Value::Integer(int))?;
        Ok(())
    }
}

impl FilterNode for AnySwitch {
    fn metadata(&self) -> NodeMetadata {
        let mut builder = NodeMetadata::builder("any_switch", "Any Switch")
            .description("A switch over five inputs of any type")
            .category(Category::Utility)
            .tags(["switch", "select", "route"])
            .non_deterministic()
            .parameter(
                ParameterDefinition::new("select", PortType::Integer, Value::Integer(1))
                    .with_range(1.0, SLOT_COUNT as f64)
                    .with_ui_hint(UiHint::SpinBox)
                    .with_description("Which connected input to pass through"),
            );
        for index in 1..=SLOT_COUNT {
            builder = builder.input(PortDefinition::input(slot_name(index), PortType::Any).optional());
        }
        builder
            .output(
                PortDefinition::output("image_output", PortType::Image)
                    .with_description("Selected image, or an 8x8 black image"),
            )
            .output(
                PortDefinition::output("text_output", PortType::String)
                    .with_description("Selected text, or an empty string"),
            )
            .output(
                PortDefinition::output("int_output", PortType::Integer)
                    .with_description("Selected integer, or 0"),
            )
            .build()
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationError> {
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let connected = (1..=SLOT_COUNT)
            .filter(|&i| !ctx.get_input_or_none(&slot_name(i)).is_none())
            .count();
        if connected == 0 {
            self.notify("No inputs connected");
            return Self::set_outputs(ctx, None, "", 0);
        }

        let select = (ctx.get_integer("select")?.max(1) as usize).min(connected);
        let selected = ctx.get_input_or_none(&slot_name(select)).clone();
        log::debug!("any_switch: {} connected, reading input_{}", connected, select);

        match selected {
            Value::None => {
                self.notify(&format!("Input {} is not connected", select));
                Self::set_outputs(ctx, None, "", 0)
            }
            Value::String(text) => Self::set_outputs(ctx, None, &text, 0),
            Value::Integer(value) => Self::set_outputs(ctx, None, "", value),
            // Booleans count as integers, 0 or 1.
            Value::Boolean(flag) => Self::set_outputs(ctx, None, "", flag as i64),
            image @ Value::Image(_) => Self::set_outputs(ctx, Some(image), "", 0),
            _ => Self::set_outputs(ctx, None, "", 0),
        }
    }

    fn is_volatile(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}
