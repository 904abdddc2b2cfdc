//! Stage 1: corrections applied to the source before the seam is built.
//!
//! Stages run in a fixed order (gradient removal, light equalization, edge
//! blur, edge fade, edge padding); each is skipped when its strength is zero.

use crate::core::buffer::{self, plane_range, value_range, MaskBuffer, RgbBuffer};
use crate::imaging::{clahe, gaussian_mask, gaussian_rgb, LabImage};
use crate::texture::params::TilerParams;
use image::{imageops, Luma};

/// Lightness ranges narrower than this are treated as flat.
const FLAT_EPSILON: f32 = 1e-6;

/// CLAHE clip limit used by light equalization.
const EQUALIZATION_CLIP_LIMIT: f32 = 0.01;

/// Run every enabled pre-filter in order.
pub fn apply(image: &RgbBuffer, params: &TilerParams) -> RgbBuffer {
    let mut result = image.clone();

    if params.gradient_removal > 0.0 {
        result = remove_gradient(&result, params.gradient_removal / 100.0);
        log::debug!("gradient removal ({}%)", params.gradient_removal);
    }
    if params.light_equalization > 0.0 {
        result = equalize_light(&result, params.light_equalization / 100.0);
        log::debug!("light equalization ({}%)", params.light_equalization);
    }
    if params.edge_blur > 0.0 {
        result = blur_edges(&result, params.edge_blur / 100.0);
        log::debug!("edge blur ({}%)", params.edge_blur);
    }
    if params.edge_fade > 0.0 {
        result = fade_edges(&result, params.edge_fade / 100.0);
        log::debug!("edge fade ({}%)", params.edge_fade);
    }
    if params.edge_padding > 0 {
        result = pad_edges(&result, params.edge_padding);
        log::debug!("edge padding -> {}x{}", result.width(), result.height());
    }

    result
}

/// Lab lightness of an image, normalized to [0, 1], with what is needed to
/// put a modified plane back.
pub(crate) struct Lightness {
    lab: LabImage,
    /// Lightness rescaled to [0, 1].
    pub normalized: MaskBuffer,
    range: (f32, f32),
    value_range: (f32, f32),
}

impl Lightness {
    /// Split `image` (clipped to [0, 1] first). `None` when lightness is flat.
    pub fn split(image: &RgbBuffer) -> Option<Self> {
        let lab = LabImage::from_rgb(&buffer::clipped(image));
        let (lo, hi) = plane_range(&lab.lightness);
        if !(hi - lo > FLAT_EPSILON) {
            return None;
        }

        let normalized = MaskBuffer::from_fn(image.width(), image.height(), |x, y| {
            Luma([(lab.lightness.get_pixel(x, y)[0] - lo) / (hi - lo)])
        });
        Some(Self {
            lab,
            normalized,
            range: (lo, hi),
            value_range: value_range(image),
        })
    }

    /// Raw Lab lightness (0..100).
    pub fn raw(&self) -> &MaskBuffer {
        &self.lab.lightness
    }

    /// Rebuild the image from a normalized lightness plane mapped back onto
    /// the original lightness range.
    pub fn recompose_normalized(&self, normalized: &MaskBuffer) -> RgbBuffer {
        let (lo, hi) = self.range;
        let lightness = MaskBuffer::from_fn(normalized.width(), normalized.height(), |x, y| {
            Luma([normalized.get_pixel(x, y)[0] * (hi - lo) + lo])
        });
        self.recompose(lightness)
    }

    /// Rebuild the image from a raw (0..100) lightness plane, rescaled to the
    /// value range of the original input.
    pub fn recompose(&self, lightness: MaskBuffer) -> RgbBuffer {
        let rgb = self.lab.with_lightness(lightness).to_rgb();
        buffer::rescale_into(&rgb, self.value_range)
    }
}

/// Flatten large-scale illumination: subtract the heavily blurred lightness
/// (centred on 0.5) scaled by `strength`.
pub fn remove_gradient(image: &RgbBuffer, strength: f32) -> RgbBuffer {
    let Some(lightness) = Lightness::split(image) else {
        log::warn!("gradient removal skipped: image lightness is flat");
        return image.clone();
    };

    let sigma = image.width().min(image.height()) as f32 / 4.0;
    let gradient = gaussian_mask(&lightness.normalized, sigma);
    let (g_lo, g_hi) = plane_range(&gradient);
    let g_span = g_hi - g_lo;

    let corrected = MaskBuffer::from_fn(image.width(), image.height(), |x, y| {
        let g = if g_span > FLAT_EPSILON {
            (gradient.get_pixel(x, y)[0] - g_lo) / g_span
        } else {
            0.5
        };
        let l = lightness.normalized.get_pixel(x, y)[0];
        Luma([(l - (g - 0.5) * strength).clamp(0.0, 1.0)])
    });
    lightness.recompose_normalized(&corrected)
}

/// Even out local brightness with CLAHE on the lightness plane, mixed in by
/// `strength`.
pub fn equalize_light(image: &RgbBuffer, strength: f32) -> RgbBuffer {
    let Some(lightness) = Lightness::split(image) else {
        log::warn!("light equalization skipped: image lightness is flat");
        return image.clone();
    };

    let kernel = (image.width().min(image.height()) / 8).max(1);
    let equalized = clahe::equalize(&lightness.normalized, (kernel, kernel), EQUALIZATION_CLIP_LIMIT);

    let mixed = MaskBuffer::from_fn(image.width(), image.height(), |x, y| {
        let l = lightness.normalized.get_pixel(x, y)[0];
        let e = equalized.get_pixel(x, y)[0];
        Luma([l * (1.0 - strength) + e * strength])
    });
    lightness.recompose_normalized(&mixed)
}

/// Blur a border band whose width grows with `strength`.
pub fn blur_edges(image: &RgbBuffer, strength: f32) -> RgbBuffer {
    let (width, height) = image.dimensions();
    let band = ((strength * width.min(height) as f32 * 0.1) as u32).max(1);

    let mut mask = MaskBuffer::new(width, height);
    for i in 0..band {
        let alpha = 1.0 - 1.0 / (1.0 + (-(i as f32 - band as f32 / 2.0)).exp());
        let raise = |mask: &mut MaskBuffer, x: u32, y: u32| {
            let p = mask.get_pixel_mut(x, y);
            p[0] = p[0].max(alpha);
        };
        if i < height {
            for x in 0..width {
                raise(&mut mask, x, i);
                raise(&mut mask, x, height - 1 - i);
            }
        }
        if i < width {
            for y in 0..height {
                raise(&mut mask, i, y);
                raise(&mut mask, width - 1 - i, y);
            }
        }
    }

    let blurred = gaussian_rgb(image, band as f32 / 3.0);
    buffer::blend(image, &blurred, &mask)
}

/// Darken toward black at the borders with a smoothstep falloff.
pub fn fade_edges(image: &RgbBuffer, strength: f32) -> RgbBuffer {
    let (width, height) = image.dimensions();
    let fade = (width.min(height) as f32 * 0.15 * strength) as u32;
    if fade < 1 {
        return image.clone();
    }

    let mut mask = MaskBuffer::from_pixel(width, height, Luma([1.0]));
    for i in 0..fade.min(height).min(width) {
        let p = i as f32 / fade as f32;
        let alpha = p * p * (3.0 - 2.0 * p);
        for x in 0..width {
            mask.get_pixel_mut(x, i)[0] *= alpha;
            mask.get_pixel_mut(x, height - 1 - i)[0] *= alpha;
        }
        for y in 0..height {
            mask.get_pixel_mut(i, y)[0] *= alpha;
            mask.get_pixel_mut(width - 1 - i, y)[0] *= alpha;
        }
    }

    let mut result = image.clone();
    for (x, y, pixel) in result.enumerate_pixels_mut() {
        let m = mask.get_pixel(x, y)[0];
        pixel.0 = pixel.0.map(|v| v * m);
    }
    result
}

/// Crop `padding` pixels from every side, capped at a quarter of the
/// smaller dimension.
pub fn pad_edges(image: &RgbBuffer, padding: u32) -> RgbBuffer {
    let (width, height) = image.dimensions();
    let padding = padding.min(height / 4).min(width / 4);
    if padding == 0 || 2 * padding >= width || 2 * padding >= height {
        return image.clone();
    }
    imageops::crop_imm(image, padding, padding, width - 2 * padding, height - 2 * padding).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn lit_ramp(width: u32, height: u32) -> RgbBuffer {
        RgbBuffer::from_fn(width, height, |x, y| {
            let v = 0.2 + 0.6 * x as f32 / (width - 1) as f32;
            Rgb([v, v * 0.9, (v + y as f32 / height as f32 * 0.1).min(1.0)])
        })
    }

    #[test]
    fn test_neutral_params_are_identity() {
        let image = lit_ramp(32, 24);
        assert_eq!(apply(&image, &TilerParams::default()), image);
    }

    #[test]
    fn test_flat_image_skips_lab_stages() {
        let image = RgbBuffer::from_pixel(16, 16, Rgb([0.5, 0.5, 0.5]));
        assert_eq!(remove_gradient(&image, 1.0), image);
        assert_eq!(equalize_light(&image, 1.0), image);
    }

    #[test]
    fn test_gradient_removal_flattens_ramp() {
        let image = lit_ramp(64, 64);
        let result = remove_gradient(&image, 1.0);
        assert_eq!(result.dimensions(), image.dimensions());

        let spread = |img: &RgbBuffer| img.get_pixel(63, 32)[1] - img.get_pixel(0, 32)[1];
        assert!(spread(&result) < spread(&image));

        let (lo, hi) = value_range(&result);
        let (in_lo, in_hi) = value_range(&image);
        assert!(lo >= in_lo - 1e-4 && hi <= in_hi + 1e-4);
    }

    #[test]
    fn test_light_equalization_keeps_shape_and_range() {
        let image = lit_ramp(48, 40);
        let result = equalize_light(&image, 0.5);
        assert_eq!(result.dimensions(), (48, 40));
        let (lo, hi) = value_range(&result);
        let (in_lo, in_hi) = value_range(&image);
        assert!(lo >= in_lo - 1e-4 && hi <= in_hi + 1e-4);
    }

    #[test]
    fn test_edge_blur_keeps_constant_image() {
        let image = RgbBuffer::from_pixel(40, 30, Rgb([0.25, 0.5, 0.75]));
        let result = blur_edges(&image, 1.0);
        for (p, q) in image.pixels().zip(result.pixels()) {
            for c in 0..3 {
                assert!((p[c] - q[c]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_edge_blur_only_touches_border() {
        let image = RgbBuffer::from_fn(60, 60, |x, y| {
            let v = if (x + y) % 2 == 0 { 1.0 } else { 0.0 };
            Rgb([v, v, v])
        });
        // band = 6; the centre is far outside it.
        let result = blur_edges(&image, 1.0);
        assert_eq!(result.get_pixel(30, 30), image.get_pixel(30, 30));
        assert_ne!(result.get_pixel(0, 30), image.get_pixel(0, 30));
    }

    #[test]
    fn test_edge_fade() {
        let image = RgbBuffer::from_pixel(40, 40, Rgb([1.0, 1.0, 1.0]));
        let result = fade_edges(&image, 1.0);
        // fade width 6: outermost ring goes black, the centre is untouched.
        assert_eq!(*result.get_pixel(0, 20), Rgb([0.0, 0.0, 0.0]));
        assert_eq!(*result.get_pixel(20, 20), Rgb([1.0, 1.0, 1.0]));
        assert!(result.get_pixel(3, 20)[0] > 0.0 && result.get_pixel(3, 20)[0] < 1.0);

        let tiny = RgbBuffer::from_pixel(4, 4, Rgb([1.0, 1.0, 1.0]));
        assert_eq!(fade_edges(&tiny, 1.0), tiny);
    }

    #[test]
    fn test_edge_padding() {
        let image = lit_ramp(64, 64);
        assert_eq!(pad_edges(&image, 8).dimensions(), (48, 48));
        assert_eq!(pad_edges(&image, 100).dimensions(), (32, 32));
        assert_eq!(pad_edges(&image, 8).get_pixel(0, 0), image.get_pixel(8, 8));

        let tiny = lit_ramp(3, 3);
        assert_eq!(pad_edges(&tiny, 5), tiny);
    }
}
