//! Seam construction: turning an image into a canvas whose opposite edges
//! meet without a visible join.

use crate::core::buffer::{mean_gray, MaskBuffer, RgbBuffer};
use crate::imaging::{canny, gaussian_mask};
use image::{imageops, Luma, Rgb};

/// Smoothing of the edge map that protects strong edges from blending.
const EDGE_SIGMA: f32 = 2.0;
/// Fraction of the blend weight removed on a full-strength edge.
const EDGE_PROTECTION: f32 = 0.5;

/// Clamp the requested overlap to `[1, min(height, width) / 2]`.
pub fn clamp_overlap(overlap: u32, height: u32, width: u32) -> u32 {
    overlap.min(height / 2).min(width / 2).max(1)
}

/// Wrap-extend by `overlap` pixels on every side and feather the interior
/// toward the wrapped content.
///
/// The result is `(W + 2o) x (H + 2o)`. The outer strips hold the wrapped
/// source as is; only the interior is blended.
pub fn simple(src: &RgbBuffer, overlap: u32) -> RgbBuffer {
    let (width, height) = src.dimensions();
    let o = clamp_overlap(overlap, height, width);
    let canvas = wrap_extend(src, o);

    let mut mask = blend_mask(width + 2 * o, height + 2 * o, o);
    let edges = gaussian_mask(&canny(&mean_gray(src), EDGE_SIGMA), EDGE_SIGMA);
    let edge_weight = pad_edge(&edges, o);
    for (m, e) in mask.pixels_mut().zip(edge_weight.pixels()) {
        m[0] *= 1.0 - EDGE_PROTECTION * e[0];
    }

    let mut out = canvas.clone();
    for (x, y, s) in src.enumerate_pixels() {
        let m = mask.get_pixel(x + o, y + o)[0];
        let c = canvas.get_pixel(x + o, y + o);
        out.put_pixel(
            x + o,
            y + o,
            Rgb([
                s[0] * (1.0 - m) + c[0] * m,
                s[1] * (1.0 - m) + c[1] * m,
                s[2] * (1.0 - m) + c[2] * m,
            ]),
        );
    }
    out
}

/// 2x2 grid of the image and its flips: `[orig | h-flip ; v-flip | both]`.
///
/// Every internal edge joins mirrored pixels, so the seams are exact.
pub fn mirror(src: &RgbBuffer) -> RgbBuffer {
    let (width, height) = src.dimensions();
    let mut canvas = RgbBuffer::new(width * 2, height * 2);
    let flipped_h = imageops::flip_horizontal(src);
    let flipped_v = imageops::flip_vertical(src);
    let flipped_both = imageops::flip_vertical(&flipped_h);

    imageops::replace(&mut canvas, src, 0, 0);
    imageops::replace(&mut canvas, &flipped_h, width as i64, 0);
    imageops::replace(&mut canvas, &flipped_v, 0, height as i64);
    imageops::replace(&mut canvas, &flipped_both, width as i64, height as i64);
    canvas
}

/// 2x2 grid of rotations on a `2M x 2M` canvas, `M = max(H, W)`, followed by
/// overlap strips copied across the inner joins.
///
/// Quadrants: original top-left, 90 degrees counter-clockwise bottom-left,
/// 180 degrees bottom-right, 90 degrees clockwise top-right. Areas a
/// non-square source does not reach stay black.
pub fn rotate(src: &RgbBuffer, overlap: u32) -> RgbBuffer {
    let (width, height) = src.dimensions();
    let o = clamp_overlap(overlap, height, width);
    let side = width.max(height);
    let m = side as i64;
    let mut canvas = RgbBuffer::new(side * 2, side * 2);

    imageops::replace(&mut canvas, src, 0, 0);
    imageops::replace(&mut canvas, &imageops::rotate270(src), 0, m);
    imageops::replace(&mut canvas, &imageops::rotate180(src), m, m);
    imageops::replace(&mut canvas, &imageops::rotate90(src), m, 0);

    let top = imageops::crop_imm(src, 0, 0, width, o).to_image();
    let left = imageops::crop_imm(src, 0, 0, o, height).to_image();
    let bottom = imageops::crop_imm(src, 0, height - o, width, o).to_image();
    let right = imageops::crop_imm(src, width - o, 0, o, height).to_image();

    imageops::replace(&mut canvas, &top, 0, height as i64);
    imageops::replace(&mut canvas, &left, width as i64, 0);
    imageops::replace(&mut canvas, &bottom, m, m + (height - o) as i64);
    imageops::replace(&mut canvas, &right, m + (width - o) as i64, m);
    canvas
}

/// Torus read of `src` shifted by `overlap`: `canvas(x, y) = src((x - o) mod W, (y - o) mod H)`.
pub fn wrap_extend(src: &RgbBuffer, overlap: u32) -> RgbBuffer {
    let (width, height) = src.dimensions();
    RgbBuffer::from_fn(width + 2 * overlap, height + 2 * overlap, |x, y| {
        let sx = (x + width * 2 - overlap % width) % width;
        let sy = (y + height * 2 - overlap % height) % height;
        *src.get_pixel(sx, sy)
    })
}

/// Logistic ramp `1 / (1 + e^-x)` over `x = linspace(-3, 3, n)`.
fn logistic_ramp(n: u32) -> Vec<f32> {
    let step = if n > 1 { 6.0 / (n - 1) as f32 } else { 0.0 };
    (0..n)
        .map(|i| {
            let x = -3.0 + step * i as f32;
            1.0 / (1.0 + (-x).exp())
        })
        .collect()
}

/// Feathered blend weights for a `width x height` canvas with border bands
/// `overlap` wide.
///
/// Zero in the interior; inside a band the weight is the logistic ramp
/// indexed by the distance to the nearest outer edge (the same on opposite
/// sides), and corner blocks take the product of both ramps. The result is
/// smoothed with a Gaussian of sigma `overlap / 4`.
pub fn blend_mask(width: u32, height: u32, overlap: u32) -> MaskBuffer {
    let ramp = logistic_ramp(overlap);
    let band = |pos: u32, size: u32| -> Option<usize> {
        if pos < overlap {
            Some(pos as usize)
        } else if pos >= size.saturating_sub(overlap) {
            Some((size - 1 - pos) as usize)
        } else {
            None
        }
    };

    let mask = MaskBuffer::from_fn(width, height, |x, y| {
        let weight = match (band(x, width), band(y, height)) {
            (Some(i), Some(j)) => ramp[i] * ramp[j],
            (Some(i), None) | (None, Some(i)) => ramp[i],
            (None, None) => 0.0,
        };
        Luma([weight])
    });
    gaussian_mask(&mask, overlap as f32 / 4.0)
}

/// Grow a plane by `pad` pixels on every side, repeating the border values.
fn pad_edge(plane: &MaskBuffer, pad: u32) -> MaskBuffer {
    let (width, height) = plane.dimensions();
    MaskBuffer::from_fn(width + 2 * pad, height + 2 * pad, |x, y| {
        let sx = x.saturating_sub(pad).min(width - 1);
        let sy = y.saturating_sub(pad).min(height - 1);
        *plane.get_pixel(sx, sy)
    })
}
