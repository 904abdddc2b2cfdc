//! Stage 3: adjustments applied to the seamless canvas.
//!
//! Fixed order: color correction, direction, repeat, detail.

use crate::core::buffer::{mean_gray, MaskBuffer, RgbBuffer};
use crate::imaging::{canny, clahe};
use crate::texture::params::{TextureDirection, TilerParams};
use crate::texture::prefilter::Lightness;
use image::{imageops, Luma};

/// Base smoothing of the detail edge map at level 1.
const DETAIL_SIGMA: f32 = 2.0;

/// Run every enabled post-filter in order.
pub fn apply(image: &RgbBuffer, params: &TilerParams) -> RgbBuffer {
    let mut result = if params.color_correction {
        log::debug!(
            "color correction (strength {}, clip limit {})",
            params.color_correction_strength,
            params.color_correction_clip_limit
        );
        correct_color(
            image,
            params.color_correction_strength,
            params.color_correction_clip_limit,
        )
    } else {
        image.clone()
    };

    result = orient(&result, params.texture_direction);
    result = repeat(&result, params.repeat_count);
    result = enhance_detail(&result, params.detail_level);
    log::debug!("post-processing -> {}x{}", result.width(), result.height());
    result
}

/// Blend CLAHE-equalized lightness into the image by `strength`.
///
/// Tiles default to one eighth of each dimension.
pub fn correct_color(image: &RgbBuffer, strength: f32, clip_limit: f32) -> RgbBuffer {
    let Some(lightness) = Lightness::split(image) else {
        log::warn!("color correction skipped: image lightness is flat");
        return image.clone();
    };

    let kernel = clahe::default_kernel(image.width(), image.height());
    let equalized = clahe::equalize(&lightness.normalized, kernel, clip_limit);
    let raw = lightness.raw();

    let corrected = MaskBuffer::from_fn(image.width(), image.height(), |x, y| {
        let l = raw.get_pixel(x, y)[0];
        let e = equalized.get_pixel(x, y)[0];
        Luma([l * (1.0 - strength) + e * 100.0 * strength])
    });
    lightness.recompose(corrected)
}

/// Rotate the canvas for the requested direction.
pub fn orient(image: &RgbBuffer, direction: TextureDirection) -> RgbBuffer {
    match direction {
        TextureDirection::Horizontal => image.clone(),
        TextureDirection::Vertical => imageops::rotate270(image),
        TextureDirection::Diagonal => imageops::rotate90(image),
    }
}

/// Tile the image `count x count` times (at least once).
pub fn repeat(image: &RgbBuffer, count: u32) -> RgbBuffer {
    let count = count.max(1);
    if count == 1 {
        return image.clone();
    }
    let (width, height) = image.dimensions();
    RgbBuffer::from_fn(width * count, height * count, |x, y| {
        *image.get_pixel(x % width, y % height)
    })
}

/// Scale edge pixels by `level`, then clip the whole buffer to [0, 1].
///
/// A level of 1.0 leaves the image untouched (no clipping either).
///
/// Edges are found with smoothing `2 / level`, but [`canny`] never smooths
/// below 1.4, so every level above roughly 1.43 finds the same edges and
/// only the gain keeps growing.
pub fn enhance_detail(image: &RgbBuffer, level: f32) -> RgbBuffer {
    if (level - 1.0).abs() < f32::EPSILON || level <= 0.0 {
        return image.clone();
    }

    let edges = canny(&mean_gray(image), DETAIL_SIGMA / level);
    let mut result = image.clone();
    for (x, y, pixel) in result.enumerate_pixels_mut() {
        let gain = if edges.get_pixel(x, y)[0] > 0.0 { level } else { 1.0 };
        pixel.0 = pixel.0.map(|v| (v * gain).clamp(0.0, 1.0));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::value_range;
    use image::Rgb;
    use proptest::prelude::*;

    fn gradient(width: u32, height: u32) -> RgbBuffer {
        RgbBuffer::from_fn(width, height, |x, y| {
            Rgb([
                x as f32 / width as f32,
                y as f32 / height as f32,
                0.5,
            ])
        })
    }

    #[test]
    fn test_neutral_settings_are_identity() {
        let image = gradient(17, 9);
        assert_eq!(apply(&image, &TilerParams::default()), image);
    }

    #[test]
    fn test_vertical_then_clockwise_restores() {
        let image = gradient(12, 7);
        let vertical = orient(&image, TextureDirection::Vertical);
        assert_eq!(vertical.dimensions(), (7, 12));
        assert_eq!(imageops::rotate90(&vertical), image);

        let diagonal = orient(&image, TextureDirection::Diagonal);
        assert_eq!(imageops::rotate270(&diagonal), image);
    }

    #[test]
    fn test_repeat_zero_means_once() {
        let image = gradient(5, 5);
        assert_eq!(repeat(&image, 0), image);
    }

    #[test]
    fn test_detail_on_flat_image_only_clips() {
        let image = RgbBuffer::from_pixel(24, 24, Rgb([0.5, 1.4, -0.2]));
        let result = enhance_detail(&image, 2.0);
        assert!(result.pixels().all(|p| *p == Rgb([0.5, 1.0, 0.0])));
        assert_eq!(enhance_detail(&image, 1.0), image);
    }

    #[test]
    fn test_detail_boosts_edges() {
        let image = RgbBuffer::from_fn(32, 32, |x, _| {
            let v = if x < 16 { 0.1 } else { 0.6 };
            Rgb([v, v, v])
        });
        let result = enhance_detail(&image, 1.5);
        let boosted = result.pixels().zip(image.pixels()).filter(|(r, i)| r[0] > i[0]).count();
        assert!(boosted > 0);
        assert!(result.pixels().all(|p| p[0] <= 1.0));
        // Flat areas away from the step are unchanged.
        assert_eq!(result.get_pixel(2, 16), image.get_pixel(2, 16));
    }

    #[test]
    fn test_high_detail_levels_share_edges() {
        let image = RgbBuffer::from_fn(32, 32, |x, _| {
            let v = if x < 16 { 0.1 } else { 0.3 };
            Rgb([v, v, v])
        });
        let changed = |level: f32| {
            let result = enhance_detail(&image, level);
            result
                .enumerate_pixels()
                .filter(|(x, y, p)| p[0] != image.get_pixel(*x, *y)[0])
                .map(|(x, y, _)| (x, y))
                .collect::<Vec<_>>()
        };
        let at_two = changed(2.0);
        assert!(!at_two.is_empty());
        assert_eq!(at_two, changed(3.0));
    }

    #[test]
    fn test_color_correction() {
        let flat = RgbBuffer::from_pixel(16, 16, Rgb([0.3, 0.3, 0.3]));
        assert_eq!(correct_color(&flat, 0.5, 0.03), flat);

        let image = gradient(40, 32);
        let result = correct_color(&image, 0.5, 0.03);
        assert_eq!(result.dimensions(), (40, 32));
        let (lo, hi) = value_range(&result);
        let (in_lo, in_hi) = value_range(&image);
        assert!(lo >= in_lo - 1e-4 && hi <= in_hi + 1e-4);
    }

    proptest! {
        #[test]
        fn prop_repeat_tiles_source(width in 1u32..12, height in 1u32..12, count in 1u32..5) {
            let image = gradient(width, height);
            let tiled = repeat(&image, count);
            prop_assert_eq!(tiled.dimensions(), (width * count, height * count));
            for by in 0..count {
                for bx in 0..count {
                    let block = imageops::crop_imm(&tiled, bx * width, by * height, width, height).to_image();
                    prop_assert_eq!(&block, &image);
                }
            }
        }
    }
}
