//! RGB float image buffers and the plain-array adapters around them.
//!
//! Every image that moves through the crate is an [`RgbBuffer`]: H×W×3
//! `f32` samples, nominally in [0, 1] but not clamped until a stage asks for
//! it. Single-channel weights (blend masks, lightness, edge maps) are
//! [`MaskBuffer`]s of the same spatial size.

use crate::core::error::BufferError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use std::path::Path;

/// H×W×3 floating point image.
pub type RgbBuffer = image::Rgb32FImage;

/// H×W single-channel floating point plane.
pub type MaskBuffer = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Number of channels at every stage boundary.
pub const CHANNELS: usize = 3;

/// Build an RGB buffer from a flat sample array and its shape.
///
/// Leading unit axes (a batch of one) are dropped. A rank-3 shape must be
/// either `(H, W, 3)` or channel-first `(3, H, W)`, which is transposed.
pub fn from_tensor(shape: &[usize], data: &[f32]) -> Result<RgbBuffer, BufferError> {
    let mut dims = shape;
    while dims.len() > 3 && dims[0] == 1 {
        dims = &dims[1..];
    }

    let expected = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| BufferError::InvalidShape {
            shape: shape.to_vec(),
        })?;
    if expected != data.len() {
        return Err(BufferError::LengthMismatch {
            shape: shape.to_vec(),
            expected,
            actual: data.len(),
        });
    }

    let (height, width, channel_first) = match dims {
        [h, w, c] if *c == CHANNELS => (*h, *w, false),
        [c, h, w] if *c == CHANNELS => (*h, *w, true),
        _ => {
            return Err(BufferError::InvalidShape {
                shape: shape.to_vec(),
            })
        }
    };

    let invalid = || BufferError::InvalidShape {
        shape: shape.to_vec(),
    };
    let width_px = u32::try_from(width).map_err(|_| invalid())?;
    let height_px = u32::try_from(height).map_err(|_| invalid())?;
    if height == 0 || width == 0 {
        return Err(BufferError::Empty {
            width: width_px,
            height: height_px,
        });
    }

    let plane = height * width;
    let buffer = RgbBuffer::from_fn(width_px, height_px, |x, y| {
        let idx = y as usize * width + x as usize;
        if channel_first {
            Rgb([data[idx], data[plane + idx], data[2 * plane + idx]])
        } else {
            let base = idx * CHANNELS;
            Rgb([data[base], data[base + 1], data[base + 2]])
        }
    });
    Ok(buffer)
}

/// Flatten a buffer into `([H, W, 3], samples)`.
pub fn to_tensor(buffer: &RgbBuffer) -> (Vec<usize>, Vec<f32>) {
    let shape = vec![buffer.height() as usize, buffer.width() as usize, CHANNELS];
    (shape, buffer.as_raw().clone())
}

/// Fail with [`BufferError::Empty`] when the buffer has no pixels.
pub fn ensure_non_empty(buffer: &RgbBuffer) -> Result<(), BufferError> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(BufferError::Empty {
            width: buffer.width(),
            height: buffer.height(),
        });
    }
    Ok(())
}

/// Convert any decoded image into an RGB float buffer (alpha is dropped).
pub fn from_dynamic(image: &DynamicImage) -> RgbBuffer {
    image.to_rgb32f()
}

/// Decode an image file into an RGB float buffer.
pub fn load(path: impl AsRef<Path>) -> Result<RgbBuffer, image::ImageError> {
    Ok(from_dynamic(&image::open(path)?))
}

/// Write a buffer as an 8-bit image; the format follows the file extension.
pub fn save(buffer: &RgbBuffer, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
    DynamicImage::ImageRgb32F(clipped(buffer)).to_rgb8().save(path)
}

/// Smallest and largest sample over all channels.
pub fn value_range(buffer: &RgbBuffer) -> (f32, f32) {
    buffer
        .as_raw()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Smallest and largest value of a plane.
pub fn plane_range(plane: &MaskBuffer) -> (f32, f32) {
    plane
        .as_raw()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Copy of the buffer with every sample clamped to [0, 1].
pub fn clipped(buffer: &RgbBuffer) -> RgbBuffer {
    map_samples(buffer, |v| v.clamp(0.0, 1.0))
}

/// Apply `f` to every sample.
pub fn map_samples(buffer: &RgbBuffer, f: impl Fn(f32) -> f32) -> RgbBuffer {
    let data = buffer.as_raw().iter().map(|&v| f(v)).collect();
    RgbBuffer::from_raw(buffer.width(), buffer.height(), data)
        .unwrap_or_else(|| RgbBuffer::new(buffer.width(), buffer.height()))
}

/// Per-pixel mean of the three channels.
pub fn mean_gray(buffer: &RgbBuffer) -> MaskBuffer {
    MaskBuffer::from_fn(buffer.width(), buffer.height(), |x, y| {
        let Rgb([r, g, b]) = *buffer.get_pixel(x, y);
        Luma([(r + g + b) / 3.0])
    })
}

/// Linear blend `a * (1 - w) + b * w`, with `w` broadcast over channels.
///
/// All three buffers must share dimensions.
pub fn blend(a: &RgbBuffer, b: &RgbBuffer, weight: &MaskBuffer) -> RgbBuffer {
    RgbBuffer::from_fn(a.width(), a.height(), |x, y| {
        let w = weight.get_pixel(x, y)[0];
        let pa = a.get_pixel(x, y);
        let pb = b.get_pixel(x, y);
        Rgb([
            pa[0] * (1.0 - w) + pb[0] * w,
            pa[1] * (1.0 - w) + pb[1] * w,
            pa[2] * (1.0 - w) + pb[2] * w,
        ])
    })
}

/// Rescale `[0, 1]` samples into `[lo, hi]`.
pub fn rescale_into(buffer: &RgbBuffer, (lo, hi): (f32, f32)) -> RgbBuffer {
    map_samples(buffer, |v| v * (hi - lo) + lo)
}
