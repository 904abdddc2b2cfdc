//! Contrast-limited adaptive histogram equalization on [0, 1] planes.
//!
//! The plane is cut into tiles of `kernel` pixels; each tile gets its own
//! clipped histogram and lookup table, and every pixel is mapped through the
//! bilinear blend of the four nearest tile tables.

use crate::core::buffer::MaskBuffer;
use image::Luma;

const BINS: usize = 256;

/// Default tile size: one eighth of each dimension, at least one pixel.
pub fn default_kernel(width: u32, height: u32) -> (u32, u32) {
    ((width / 8).max(1), (height / 8).max(1))
}

/// Equalize `plane` (values in [0, 1]) with tiles of `kernel = (width, height)`.
///
/// `clip_limit` is the fraction of a tile's pixels any single bin may hold;
/// the excess is spread evenly over all bins. The output lies in [0, 1].
pub fn equalize(plane: &MaskBuffer, kernel: (u32, u32), clip_limit: f32) -> MaskBuffer {
    let (width, height) = plane.dimensions();
    if width == 0 || height == 0 {
        return plane.clone();
    }

    let kw = kernel.0.clamp(1, width) as usize;
    let kh = kernel.1.clamp(1, height) as usize;
    let (w, h) = (width as usize, height as usize);
    let tiles_x = w.div_ceil(kw);
    let tiles_y = h.div_ceil(kh);

    let bin_of = |v: f32| (v.clamp(0.0, 1.0) * (BINS - 1) as f32).round() as usize;

    let mut luts = vec![[0.0f32; BINS]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0.0f32; BINS];
            let (y0, y1) = (ty * kh, ((ty + 1) * kh).min(h));
            let (x0, x1) = (tx * kw, ((tx + 1) * kw).min(w));
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[bin_of(plane.get_pixel(x as u32, y as u32)[0])] += 1.0;
                }
            }
            let pixels = ((y1 - y0) * (x1 - x0)) as f32;
            clip_histogram(&mut hist, (clip_limit * (kw * kh) as f32).max(1.0).floor());
            luts[ty * tiles_x + tx] = cumulative_lut(&hist, pixels);
        }
    }

    // Tile centre coordinates, clamped at the borders.
    let grid = |pos: usize, size: usize, count: usize| {
        let g = ((pos as f32 + 0.5) / size as f32 - 0.5).clamp(0.0, (count - 1) as f32);
        let lo = g.floor() as usize;
        let hi = (lo + 1).min(count - 1);
        (lo, hi, g - lo as f32)
    };

    MaskBuffer::from_fn(width, height, |x, y| {
        let bin = bin_of(plane.get_pixel(x, y)[0]);
        let (ty0, ty1, fy) = grid(y as usize, kh, tiles_y);
        let (tx0, tx1, fx) = grid(x as usize, kw, tiles_x);

        let v00 = luts[ty0 * tiles_x + tx0][bin];
        let v01 = luts[ty0 * tiles_x + tx1][bin];
        let v10 = luts[ty1 * tiles_x + tx0][bin];
        let v11 = luts[ty1 * tiles_x + tx1][bin];
        let top = v00 * (1.0 - fx) + v01 * fx;
        let bottom = v10 * (1.0 - fx) + v11 * fx;
        Luma([(top * (1.0 - fy) + bottom * fy).clamp(0.0, 1.0)])
    })
}

fn clip_histogram(hist: &mut [f32; BINS], limit: f32) {
    let mut excess = 0.0;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }
    let share = excess / BINS as f32;
    for count in hist.iter_mut() {
        *count += share;
    }
}

fn cumulative_lut(hist: &[f32; BINS], pixels: f32) -> [f32; BINS] {
    let mut lut = [0.0f32; BINS];
    let mut total = 0.0;
    for (slot, count) in lut.iter_mut().zip(hist) {
        total += count;
        *slot = (total / pixels).min(1.0);
    }
    lut
}
