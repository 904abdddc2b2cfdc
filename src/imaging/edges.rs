//! Canny edge maps on float planes.

use crate::core::buffer::MaskBuffer;
use crate::imaging::blur::gaussian_mask;
use image::{GrayImage, Luma};
use imageproc::edges::canny as canny_u8;

/// Smoothing `imageproc`'s detector always applies before differentiating.
const BUILTIN_SIGMA: f32 = 1.4;

/// Hysteresis thresholds on the Sobel magnitude of a [0, 1] plane.
const LOW_THRESHOLD: f32 = 0.1;
const HIGH_THRESHOLD: f32 = 0.2;

/// Binary Canny edge map (1.0 on edges, 0.0 elsewhere) with smoothing `sigma`.
///
/// The input is expected in [0, 1]; values outside are clamped. The total
/// smoothing is `sigma`: the plane is pre-blurred by whatever the detector's
/// own 1.4 blur does not already cover, so any `sigma` below 1.4 behaves
/// as 1.4.
pub fn canny(plane: &MaskBuffer, sigma: f32) -> MaskBuffer {
    let (width, height) = plane.dimensions();
    if width == 0 || height == 0 {
        return plane.clone();
    }

    let extra = (sigma * sigma - BUILTIN_SIGMA * BUILTIN_SIGMA).max(0.0).sqrt();
    let smoothed = gaussian_mask(plane, extra);

    let gray = GrayImage::from_fn(width, height, |x, y| {
        let v = smoothed.get_pixel(x, y)[0].clamp(0.0, 1.0);
        Luma([(v * 255.0).round() as u8])
    });
    let edges = canny_u8(&gray, LOW_THRESHOLD * 255.0, HIGH_THRESHOLD * 255.0);

    MaskBuffer::from_fn(width, height, |x, y| {
        Luma([if edges.get_pixel(x, y)[0] > 0 { 1.0 } else { 0.0 }])
    })
}
