//! Stage 4: final resampling to the requested tile size and the preview.

use crate::core::buffer::{clipped, RgbBuffer};
use crate::texture::params::Interpolation;
use image::imageops::{self, FilterType};

/// Side of the square preview image.
pub const PREVIEW_SIZE: u32 = 256;

/// Resampling filter for each interpolation mode.
pub fn filter_type(interpolation: Interpolation) -> FilterType {
    match interpolation {
        Interpolation::Nearest => FilterType::Nearest,
        Interpolation::Bilinear => FilterType::Triangle,
        Interpolation::Bicubic => FilterType::CatmullRom,
    }
}

/// Resample to `size x size`, clipped to [0, 1].
pub fn resize_square(image: &RgbBuffer, size: u32, interpolation: Interpolation) -> RgbBuffer {
    clipped(&imageops::resize(image, size, size, filter_type(interpolation)))
}

/// Bilinear `PREVIEW_SIZE` square preview of a tile.
pub fn preview(tile: &RgbBuffer) -> RgbBuffer {
    resize_square(tile, PREVIEW_SIZE, Interpolation::Bilinear)
}
