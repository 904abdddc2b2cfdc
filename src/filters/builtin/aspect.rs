//! Aspect ratio helper: preset or custom dimensions, swapped, snapped and
//! scaled.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};
use crate::core::types::{PortType, Value};
use crate::filters::registry::NodeRegistry;

/// Register the aspect ratio node.
pub fn register(registry: &mut NodeRegistry) {
    registry.register(|| Box::new(AspectRatio));
}

/// Categories offered by the node.
pub const CATEGORIES: &[&str] = &["Custom", "Print", "Social Media", "Cinema", "Flux"];

/// Named sizes, keyed by the subcategory string a host shows.
pub const ASPECT_PRESETS: &[(&str, u32, u32)] = &[
    ("A4 - 2480x3508", 2480, 3508),
    ("A5 - 1748x2480", 1748, 2480),
    ("Letter - 2550x3300", 2550, 3300),
    ("Legal - 2550x4200", 2550, 4200),
    ("Instagram Square - 1080x1080", 1080, 1080),
    ("Facebook Cover - 851x315", 851, 315),
    ("Twitter Post - 1200x675", 1200, 675),
    ("LinkedIn Banner - 1584x396", 1584, 396),
    ("16:9 - 1920x1080", 1920, 1080),
    ("2.35:1 - 1920x817", 1920, 817),
    ("4:3 - 1440x1080", 1440, 1080),
    ("1:1 - 1080x1080", 1080, 1080),
];

/// Smallest side ever returned.
const MIN_SIDE: i64 = 32;

/// Inputs to [`calculate_dimensions`].
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRequest<'a> {
    pub category: &'a str,
    pub subcategory: &'a str,
    pub width: i64,
    pub height: i64,
    pub swap: bool,
    pub upscale_factor: f64,
    pub round_to_64: bool,
}

/// Parse the `WxH` part of a `"Name - WxH"` subcategory.
fn parse_flux(subcategory: &str) -> Option<(i64, i64)> {
    let dims = subcategory.split(" - ").nth(1)?;
    let (w, h) = dims.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Round to two decimals, ties to even on the scaled value.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Resolve the final `(width, height, upscale_factor)`.
///
/// Order: preset or Flux lookup, swap, ceil to a multiple of 64, scale by
/// the factor (rounded to two decimals), then a floor of 32 per side.
pub fn calculate_dimensions(request: &DimensionRequest) -> Result<(i64, i64, f64), String> {
    if request.width <= 0 || request.height <= 0 {
        return Err("Width and height must be positive values".to_string());
    }
    if request.upscale_factor.is_nan() || request.upscale_factor <= 0.0 {
        return Err("Upscale factor must be positive".to_string());
    }
    let upscale = round2(request.upscale_factor);

    let (mut width, mut height) = (request.width, request.height);
    if request.category == "Flux" && !request.subcategory.is_empty() {
        if let Some(dims) = parse_flux(request.subcategory) {
            (width, height) = dims;
        }
    } else if request.category != "Custom" {
        if let Some((_, w, h)) = ASPECT_PRESETS.iter().find(|(name, _, _)| *name == request.subcategory) {
            (width, height) = (*w as i64, *h as i64);
        }
    }

    if request.swap {
        std::mem::swap(&mut width, &mut height);
    }
    if request.round_to_64 {
        width = (width as f64 / 64.0).ceil() as i64 * 64;
        height = (height as f64 / 64.0).ceil() as i64 * 64;
    }

    let scale = |side: i64| ((side as f64 * upscale).round_ties_even() as i64).max(MIN_SIDE);
    Ok((scale(width), scale(height), upscale))
}

/// Width/height calculator with print, social and cinema presets.
#[derive(Debug, Clone)]
pub struct AspectRatio;

impl FilterNode for AspectRatio {
    fn metadata(&self) -> NodeMetadata {
        NodeMetadata::builder("aspect_ratio", "Aspect Ratio")
            .description("Pick output dimensions from a preset or custom size, with swap, 64-snapping and upscale")
            .category(Category::Math)
            .tags(["aspect", "resolution", "dimensions", "preset"])
            .parameter(
                ParameterDefinition::new("category", PortType::String, Value::String("Custom".to_string()))
                    .with_choices(CATEGORIES),
            )
            .parameter(
                ParameterDefinition::new("subcategory", PortType::String, Value::String("Custom".to_string()))
                    .with_ui_hint(UiHint::TextInput { multiline: false })
                    .with_description("Preset key, e.g. \"A4 - 2480x3508\""),
            )
            .parameter(
                ParameterDefinition::new("width", PortType::Integer, Value::Integer(512))
                    .with_range(32.0, 8192.0)
                    .with_constraint(Constraint::Step(8.0))
                    .with_group("Size"),
            )
            .parameter(
                ParameterDefinition::new("height", PortType::Integer, Value::Integer(512))
                    .with_range(32.0, 8192.0)
                    .with_constraint(Constraint::Step(8.0))
                    .with_group("Size"),
            )
            .parameter(
                ParameterDefinition::new("swap_dimensions", PortType::Boolean, Value::Boolean(false))
                    .with_ui_hint(UiHint::Checkbox)
                    .with_group("Size"),
            )
            .parameter(
                ParameterDefinition::new("upscale_factor", PortType::Float, Value::Float(1.0))
                    .with_range(0.1, 4.0)
                    .with_group("Scale"),
            )
            .parameter(
                ParameterDefinition::new("round_to_64", PortType::Boolean, Value::Boolean(false))
                    .with_ui_hint(UiHint::Checkbox)
                    .with_group("Scale"),
            )
            .output(PortDefinition::output("width", PortType::Integer))
            .output(PortDefinition::output("height", PortType::Integer))
            .output(
                PortDefinition::output("upscale_factor", PortType::Float)
                    .with_description("Factor actually applied (two decimals)"),
            )
            .build()
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationError> {
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let request = DimensionRequest {
            category: ctx.get_string("category")?,
            subcategory: ctx.get_string("subcategory")?,
            width: ctx.get_integer("width")?,
            height: ctx.get_integer("height")?,
            swap: ctx.get_bool("swap_dimensions")?,
            upscale_factor: ctx.get_float("upscale_factor")?,
            round_to_64: ctx.get_bool("round_to_64")?,
        };
        let (width, height, upscale) =
            calculate_dimensions(&request).map_err(|error| ExecutionError::NodeExecution {
                node_id: ctx.node_id,
                error,
            })?;
        log::debug!("aspect_ratio: {}x{} at x{}", width, height, upscale);

        ctx.set_output("width", Value::Integer(width))?;
        ctx.set_output("height", Value::Integer(height))?;
        ctx.set_output("upscale_factor", Value::Float(upscale))?;
        Ok(())
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

    fn request<'a>(category: &'a str, subcategory: &'a str) -> DimensionRequest<'a> {
        DimensionRequest {
            category,
            subcategory,
            width: 512,
            height: 512,
            swap: false,
            upscale_factor: 1.0,
            round_to_64: false,
        }
    }

    #[test]
    fn test_custom_passthrough() {
        assert_eq!(calculate_dimensions(&request("Custom", "A4 - 2480x3508")), Ok((512, 512, 1.0)));
    }

    #[test]
    fn test_preset_lookup_and_swap() {
        let mut req = request("Print", "A4 - 2480x3508");
        assert_eq!(calculate_dimensions(&req), Ok((2480, 3508, 1.0)));

        req.swap = true;
        assert_eq!(calculate_dimensions(&req), Ok((3508, 2480, 1.0)));

        // Unknown preset keeps the custom size.
        assert_eq!(calculate_dimensions(&request("Cinema", "70mm")), Ok((512, 512, 1.0)));
    }

    #[test]
    fn test_flux_parsing() {
        assert_eq!(
            calculate_dimensions(&request("Flux", "Portrait - 896x1152")),
            Ok((896, 1152, 1.0))
        );
        assert_eq!(calculate_dimensions(&request("Flux", "garbage")), Ok((512, 512, 1.0)));
        assert_eq!(calculate_dimensions(&request("Flux", "Wide - 12xabc")), Ok((512, 512, 1.0)));
    }

    #[test]
    fn test_round_then_scale() {
        let mut req = request("Social Media", "Facebook Cover - 851x315");
        req.round_to_64 = true;
        assert_eq!(calculate_dimensions(&req), Ok((896, 320, 1.0)));

        req.upscale_factor = 1.504;
        assert_eq!(calculate_dimensions(&req), Ok((1344, 480, 1.5)));
    }

    #[test]
    fn test_minimum_side_and_errors() {
        let mut req = request("Custom", "");
        req.width = 40;
        req.height = 100;
        req.upscale_factor = 0.1;
        assert_eq!(calculate_dimensions(&req), Ok((32, 32, 0.1)));

        req.width = 0;
        assert!(calculate_dimensions(&req).is_err());

        let mut req = request("Custom", "");
        req.upscale_factor = 0.0;
        assert!(calculate_dimensions(&req).is_err());
    }

    #[test]
    fn test_node_outputs() {
        let params = HashMap::from([
            ("category".to_string(), Value::String("Cinema".to_string())),
            ("subcategory".to_string(), Value::String("16:9 - 1920x1080".to_string())),
            ("upscale_factor".to_string(), Value::Float(2.0)),
        ]);
        let outputs = invoke(&AspectRatio, HashMap::new(), params).unwrap();
        assert_eq!(outputs["width"], Value::Integer(3840));
        assert_eq!(outputs["height"], Value::Integer(2160));
        assert_eq!(outputs["upscale_factor"], Value::Float(2.0));

        let bad = HashMap::from([("category".to_string(), Value::String("Poster".to_string()))]);
        assert!(invoke(&AspectRatio, HashMap::new(), bad).is_err());
    }
}
