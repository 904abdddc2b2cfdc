//! Seamless texture node: the tiling pipeline behind the node contract.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::node::{Category, FilterNode, NodeMetadata};
use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};
use crate::core::types::{PortType, Value};
use crate::filters::registry::NodeRegistry;
use crate::texture::{Interpolation, PatternType, TextureDirection, TextureTiler, TilerParams};

/// Register the seamless texture node.
pub fn register(registry: &mut NodeRegistry) {
    registry.register(|| Box::new(SeamlessTexture));
}

/// Turns an image into a seamless square tile plus a preview.
#[derive(Debug, Clone)]
pub struct SeamlessTexture;

fn choices<T: Copy>(all: &[T], name: impl Fn(&T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(name).collect()
}

fn int_param(name: &str, default: u32, min: f64, max: f64) -> ParameterDefinition {
    ParameterDefinition::new(name, PortType::Integer, Value::Integer(default as i64))
        .with_range(min, max)
}

fn float_param(name: &str, default: f32, min: f64, max: f64) -> ParameterDefinition {
    ParameterDefinition::new(name, PortType::Float, Value::Float(default as f64))
        .with_range(min, max)
}

fn string_param(name: &str, default: &str, options: &[&str]) -> ParameterDefinition {
    ParameterDefinition::new(name, PortType::String, Value::String(default.to_string()))
        .with_choices(options)
}

impl SeamlessTexture {
    /// Read every tiler field out of the context.
    fn params(ctx: &ExecutionContext) -> Result<TilerParams, ExecutionError> {
        let uint = |name: &str| -> Result<u32, ExecutionError> {
            let value = ctx.get_integer(name)?;
            u32::try_from(value).map_err(|_| ExecutionError::NodeExecution {
                node_id: ctx.node_id,
                error: format!("Parameter '{}' out of range: {}", name, value),
            })
        };
        let float = |name: &str| -> Result<f32, ExecutionError> { Ok(ctx.get_float(name)? as f32) };

        Ok(TilerParams {
            tile_size: uint("tile_size")?,
            overlap: uint("overlap")?,
            pattern_type: ctx.get_string("pattern_type")?.parse::<PatternType>()?,
            interpolation: ctx.get_string("interpolation")?.parse::<Interpolation>()?,
            repeat_count: uint("repeat_count")?,
            texture_direction: ctx.get_string("texture_direction")?.parse::<TextureDirection>()?,
            detail_level: float("detail_level")?,
            edge_padding: uint("edge_padding")?,
            edge_blur: float("edge_blur")?,
            edge_fade: float("edge_fade")?,
            color_correction: ctx.get_bool("color_correction")?,
            color_correction_strength: float("color_correction_strength")?,
            color_correction_clip_limit: float("color_correction_clip_limit")?,
            light_equalization: float("light_equalization")?,
            gradient_removal: float("gradient_removal")?,
        })
    }
}

impl FilterNode for SeamlessTexture {
    fn metadata(&self) -> NodeMetadata {
        let d = TilerParams::default();
        NodeMetadata::builder("seamless_texture", "Seamless Texture")
            .description("Make an image tile seamlessly, with optional clean-up and detail passes")
            .category(Category::Texture)
            .tags(["seamless", "tile", "texture", "pattern"])
            .input(PortDefinition::input("image", PortType::Image).with_description("Source image"))
            .output(
                PortDefinition::output("tile", PortType::Image)
                    .with_description("Square seamless tile of side tile_size"),
            )
            .output(
                PortDefinition::output("preview", PortType::Image)
                    .with_description("256x256 downscale of the tile"),
            )
            .parameter(
                int_param("tile_size", d.tile_size, 64.0, 2048.0)
                    .with_constraint(Constraint::Step(64.0))
                    .with_description("Side of the output tile")
                    .with_group("Tile"),
            )
            .parameter(
                int_param("overlap", d.overlap, 0.0, 256.0)
                    .with_constraint(Constraint::Step(8.0))
                    .with_description("Width of the blended border")
                    .with_group("Tile"),
            )
            .parameter(
                string_param(
                    "pattern_type",
                    d.pattern_type.as_str(),
                    &choices(PatternType::ALL, PatternType::as_str),
                )
                .with_group("Tile"),
            )
            .parameter(
                string_param(
                    "interpolation",
                    d.interpolation.as_str(),
                    &choices(Interpolation::ALL, Interpolation::as_str),
                )
                .with_group("Tile"),
            )
            .parameter(
                int_param("repeat_count", d.repeat_count, 1.0, 10.0)
                    .with_ui_hint(UiHint::SpinBox)
                    .with_description("Copies per side")
                    .with_group("Layout"),
            )
            .parameter(
                string_param(
                    "texture_direction",
                    d.texture_direction.as_str(),
                    &choices(TextureDirection::ALL, TextureDirection::as_str),
                )
                .with_group("Layout"),
            )
            .parameter(
                float_param("detail_level", d.detail_level, 0.1, 2.0)
                    .with_description("Edge contrast multiplier; 1.0 leaves the tile alone")
                    .with_group("Detail"),
            )
            .parameter(
                int_param("edge_padding", d.edge_padding, 0.0, 128.0)
                    .with_description("Pixels cropped from every side before seaming")
                    .with_group("Edges"),
            )
            .parameter(float_param("edge_blur", d.edge_blur, 0.0, 100.0).with_group("Edges"))
            .parameter(float_param("edge_fade", d.edge_fade, 0.0, 100.0).with_group("Edges"))
            .parameter(
                ParameterDefinition::new(
                    "color_correction",
                    PortType::Boolean,
                    Value::Boolean(d.color_correction),
                )
                .with_ui_hint(UiHint::Checkbox)
                .with_group("Color"),
            )
            .parameter(
                float_param("color_correction_strength", d.color_correction_strength, 0.0, 1.0)
                    .with_group("Color"),
            )
            .parameter(
                float_param("color_correction_clip_limit", d.color_correction_clip_limit, 0.01, 0.1)
                    .with_description("CLAHE clip limit")
                    .with_group("Color"),
            )
            .parameter(
                float_param("light_equalization", d.light_equalization, 0.0, 100.0)
                    .with_group("Color"),
            )
            .parameter(
                float_param("gradient_removal", d.gradient_removal, 0.0, 100.0).with_group("Color"),
            )
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        let image = ctx.get_input_image("image")?;
        if image.metadata.width == 0 || image.metadata.height == 0 {
            return Err(ValidationError::CustomValidation {
                node_id: ctx.node_id,
                error: "Input image has no pixels".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let tiler = TextureTiler::new(Self::params(ctx)?)?;
        let image = ctx.take_input_buffer("image")?;
        let output = tiler.run(&image)?;

        ctx.set_output_image("tile", output.tile)?;
        ctx.set_output_image("preview", output.preview)?;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}
