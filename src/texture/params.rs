//! Tiler parameters and their enumerated options.

use crate::core::error::TilerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the seam-free canvas is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Wrap-extend by the overlap and feather the border bands.
    #[default]
    Simple,
    /// 2x2 grid of the image and its flips.
    Mirror,
    /// 2x2 grid of the image and its rotations.
    Rotate,
}

/// Resampling filter for the final resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

/// Orientation applied after the seam is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextureDirection {
    #[default]
    Horizontal,
    /// Rotated 90 degrees counter-clockwise.
    Vertical,
    /// Rotated 90 degrees clockwise.
    Diagonal,
}

macro_rules! string_enum {
    ($ty:ident, $($variant:ident => $name:literal),+ $(,)?) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Lowercase name used in parameter files and node parameters.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TilerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(TilerError::InvalidParameter {
                        parameter: stringify!($ty).to_string(),
                        reason: format!("unknown option '{}'", other),
                    }),
                }
            }
        }
    };
}

string_enum!(PatternType, Simple => "simple", Mirror => "mirror", Rotate => "rotate");
string_enum!(Interpolation, Nearest => "nearest", Bilinear => "bilinear", Bicubic => "bicubic");
string_enum!(
    TextureDirection,
    Horizontal => "horizontal",
    Vertical => "vertical",
    Diagonal => "diagonal",
);

/// Every knob of the tiling pipeline.
///
/// Percent-valued fields (`edge_blur`, `edge_fade`, `light_equalization`,
/// `gradient_removal`) are in 0..=100 and divided by 100 before use.
/// Missing fields in a parameter file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilerParams {
    /// Side of the square output tile.
    pub tile_size: u32,
    /// Width of the blended border, clamped to half the image.
    pub overlap: u32,
    pub pattern_type: PatternType,
    pub interpolation: Interpolation,
    /// Copies per side in the repeat grid.
    pub repeat_count: u32,
    pub texture_direction: TextureDirection,
    /// Edge contrast multiplier; 1.0 disables the stage.
    pub detail_level: f32,
    /// Pixels cropped from every side before seaming.
    pub edge_padding: u32,
    pub edge_blur: f32,
    pub edge_fade: f32,
    pub color_correction: bool,
    pub color_correction_strength: f32,
    pub color_correction_clip_limit: f32,
    pub light_equalization: f32,
    pub gradient_removal: f32,
}

impl Default for TilerParams {
    fn default() -> Self {
        Self {
            tile_size: 512,
            overlap: 64,
            pattern_type: PatternType::Simple,
            interpolation: Interpolation::Bilinear,
            repeat_count: 1,
            texture_direction: TextureDirection::Horizontal,
            detail_level: 1.0,
            edge_padding: 0,
            edge_blur: 0.0,
            edge_fade: 0.0,
            color_correction: false,
            color_correction_strength: 0.5,
            color_correction_clip_limit: 0.03,
            light_equalization: 0.0,
            gradient_removal: 0.0,
        }
    }
}

impl TilerParams {
    /// Reject values no stage can work with.
    ///
    /// Range limits beyond these (e.g. `tile_size` in steps of 64) are
    /// enforced by the node's parameter constraints, not here.
    pub fn validate(&self) -> Result<(), TilerError> {
        let invalid = |parameter: &str, reason: &str| {
            Err(TilerError::InvalidParameter {
                parameter: parameter.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.tile_size == 0 {
            return invalid("tile_size", "must be at least 1");
        }
        if !self.detail_level.is_finite() || self.detail_level <= 0.0 {
            return invalid("detail_level", "must be a positive number");
        }
        for (name, value) in [
            ("edge_blur", self.edge_blur),
            ("edge_fade", self.edge_fade),
            ("light_equalization", self.light_equalization),
            ("gradient_removal", self.gradient_removal),
            ("color_correction_strength", self.color_correction_strength),
            ("color_correction_clip_limit", self.color_correction_clip_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(name, "must be a non-negative number");
            }
        }
        Ok(())
    }
}
