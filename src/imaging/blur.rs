//! Gaussian smoothing of masks and RGB buffers.

use crate::core::buffer::{MaskBuffer, RgbBuffer};
use imageproc::filter::gaussian_blur_f32;

/// Gaussian blur of a single-channel plane.
///
/// A non-positive (or non-finite) sigma returns a copy.
pub fn gaussian_mask(plane: &MaskBuffer, sigma: f32) -> MaskBuffer {
    if !(sigma.is_finite() && sigma > 0.0) || plane.width() == 0 || plane.height() == 0 {
        return plane.clone();
    }
    gaussian_blur_f32(plane, sigma)
}

/// Per-channel Gaussian blur of an RGB buffer.
pub fn gaussian_rgb(buffer: &RgbBuffer, sigma: f32) -> RgbBuffer {
    if !(sigma.is_finite() && sigma > 0.0) || buffer.width() == 0 || buffer.height() == 0 {
        return buffer.clone();
    }
    gaussian_blur_f32(buffer, sigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut plane = MaskBuffer::new(5, 5);
        plane.put_pixel(2, 2, Luma([1.0]));
        assert_eq!(gaussian_mask(&plane, 0.0), plane);
        assert_eq!(gaussian_mask(&plane, f32::NAN), plane);
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut plane = MaskBuffer::new(9, 9);
        plane.put_pixel(4, 4, Luma([1.0]));
        let blurred = gaussian_mask(&plane, 1.5);

        let center = blurred.get_pixel(4, 4)[0];
        assert!(center < 1.0 && center > 0.0);
        assert!(blurred.get_pixel(3, 4)[0] > 0.0);
        assert!(blurred.get_pixel(3, 4)[0] < center);
        // Symmetric kernel.
        let left = blurred.get_pixel(3, 4)[0];
        let right = blurred.get_pixel(5, 4)[0];
        assert!((left - right).abs() < 1e-6);
    }

    #[test]
    fn test_constant_rgb_stays_constant() {
        let buffer = RgbBuffer::from_pixel(12, 7, Rgb([0.2, 0.4, 0.6]));
        let blurred = gaussian_rgb(&buffer, 3.0);
        for p in blurred.pixels() {
            assert!((p[0] - 0.2).abs() < 1e-5);
            assert!((p[1] - 0.4).abs() < 1e-5);
            assert!((p[2] - 0.6).abs() < 1e-5);
        }
    }
}
