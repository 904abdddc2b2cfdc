//! Multi-value helpers: a bank of float sliders and a weighted prompt joiner.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{ParameterDefinition, PortDefinition, UiHint};
use crate::core::types::{PortType, Value};
use crate::filters::registry::NodeRegistry;

/// Register both multi-value nodes.
pub fn register(registry: &mut NodeRegistry) {
    registry.register(|| Box::new(MultiFloat));
    registry.register(|| Box::new(MultiText));
}

const FLOAT_SLOTS: usize = 10;
const TEXT_SLOTS: usize = 8;

/// Ten float parameters exposed as ten float outputs.
#[derive(Debug, Clone)]
pub struct MultiFloat;

impl FilterNode for MultiFloat {
    fn metadata(&self) -> NodeMetadata {
        let mut builder = NodeMetadata::builder("multi_float", "Multi Float")
            .description("Ten float values in one node")
            .category(Category::Math);
        for i in 1..=FLOAT_SLOTS {
            let name = format!("value{}", i);
            builder = builder
                .parameter(
                    ParameterDefinition::new(&name, PortType::Float, Value::Float(0.0))
                        .with_range(-100.0, 100.0),
                )
                .output(PortDefinition::output(&name, PortType::Float));
        }
        builder.build()
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationError> {
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        for i in 1..=FLOAT_SLOTS {
            let name = format!("value{}", i);
            let value = ctx.get_float(&name)?;
            ctx.set_output(name, Value::Float(value))?;
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

/// Join `(text, weight)` pairs into one prompt string.
///
/// Texts are trimmed and empty ones skipped. A weight of exactly 1.0 keeps
/// the text as is; any other weight renders as `(text:W.W)`.
pub fn combine_text<'a>(
    separator: &str,
    slots: impl IntoIterator<Item = (&'a str, f64)>,
) -> String {
    slots
        .into_iter()
        .filter_map(|(text, weight)| {
            let text = text.trim();
            if text.is_empty() {
                None
            } else if weight == 1.0 {
                Some(text.to_string())
            } else {
                Some(format!("({}:{:.1})", text, weight))
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Weighted prompt builder over eight text slots.
#[derive(Debug, Clone)]
pub struct MultiText;

impl FilterNode for MultiText {
    fn metadata(&self) -> NodeMetadata {
        let mut builder = NodeMetadata::builder("multi_text", "Multi Text")
            .description("Combine up to eight weighted texts into a single prompt")
            .category(Category::Text)
            .tags(["prompt", "text", "weight"])
            .parameter(
                ParameterDefinition::new("separator", PortType::String, Value::String(" ".to_string()))
                    .with_description("Placed between kept texts"),
            )
            .parameter(
                ParameterDefinition::new("active", PortType::Boolean, Value::Boolean(true))
                    .with_ui_hint(UiHint::Checkbox)
                    .with_description("When off the output is empty"),
            )
            .output(PortDefinition::output("text", PortType::String));
        for i in 1..=TEXT_SLOTS {
            builder = builder
                .parameter(
                    ParameterDefinition::new(format!("text{}", i), PortType::String, Value::String(String::new()))
                        .with_ui_hint(UiHint::TextInput { multiline: true })
                        .with_group(format!("Slot {}", i)),
                )
                .parameter(
                    ParameterDefinition::new(format!("weight{}", i), PortType::Float, Value::Float(1.0))
                        .with_range(0.0, 2.0)
                        .with_group(format!("Slot {}", i)),
                );
        }
        builder.build()
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationError> {
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        if !ctx.get_bool("active")? {
            return ctx.set_output("text", Value::String(String::new()));
        }

        let mut slots = Vec::with_capacity(TEXT_SLOTS);
        for i in 1..=TEXT_SLOTS {
            let text = ctx.get_string(&format!("text{}", i))?;
            let weight = ctx.get_float(&format!("weight{}", i))?;
            slots.push((text, weight));
        }
        let combined = combine_text(ctx.get_string("separator")?, slots);
        ctx.set_output("text", Value::String(combined))
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::invoke;
    use std::collections::HashMap;

    fn params(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn text(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_combine_text_weights() {
        let joined = combine_text(", ", [("  cat ", 1.0), ("", 0.5), ("dog", 1.3), ("sky", 0.0)]);
        assert_eq!(joined, "cat, (dog:1.3), (sky:0.0)");
        assert_eq!(combine_text(" ", Vec::<(&str, f64)>::new()), "");
    }

    #[test]
    fn test_multi_text_node() {
        let outputs = invoke(
            &MultiText,
            HashMap::new(),
            params(&[
                ("separator", text(" | ")),
                ("text1", text("stone wall")),
                ("text3", text("moss")),
                ("weight3", Value::Float(1.5)),
                ("text4", text("   ")),
            ]),
        )
        .unwrap();
        assert_eq!(outputs["text"], text("stone wall | (moss:1.5)"));
    }

    #[test]
    fn test_multi_text_inactive() {
        let outputs = invoke(
            &MultiText,
            HashMap::new(),
            params(&[("active", Value::Boolean(false)), ("text1", text("ignored"))]),
        )
        .unwrap();
        assert_eq!(outputs["text"], text(""));
    }

    #[test]
    fn test_multi_text_weight_range() {
        let result = invoke(
            &MultiText,
            HashMap::new(),
            params(&[("weight2", Value::Float(2.5))]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_multi_float_passthrough() {
        let outputs = invoke(
            &MultiFloat,
            HashMap::new(),
            params(&[("value1", Value::Float(-3.5)), ("value10", Value::Integer(42))]),
        )
        .unwrap();
        assert_eq!(outputs.len(), 10);
        assert_eq!(outputs["value1"], Value::Float(-3.5));
        assert_eq!(outputs["value5"], Value::Float(0.0));
        assert_eq!(outputs["value10"], Value::Float(42.0));

        let err = invoke(&MultiFloat, HashMap::new(), params(&[("value2", Value::Float(101.0))]));
        assert!(err.is_err());
    }
}
