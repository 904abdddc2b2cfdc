//! sRGB <-> CIE-Lab (D65) conversion.
//!
//! Lightness is in [0, 100]; a/b are unbounded chroma axes. Conversion back
//! to RGB clamps to [0, 1].

use crate::core::buffer::{MaskBuffer, RgbBuffer};
use image::{Luma, Rgb};
use palette::white_point::D65;
use palette::{FromColor, Lab, Srgb};

/// An image split into lightness and chroma planes.
#[derive(Debug, Clone, PartialEq)]
pub struct LabImage {
    pub lightness: MaskBuffer,
    pub a: MaskBuffer,
    pub b: MaskBuffer,
}

impl LabImage {
    /// Convert an sRGB buffer.
    pub fn from_rgb(buffer: &RgbBuffer) -> Self {
        let (width, height) = buffer.dimensions();
        let mut lightness = MaskBuffer::new(width, height);
        let mut a = MaskBuffer::new(width, height);
        let mut b = MaskBuffer::new(width, height);

        for (x, y, pixel) in buffer.enumerate_pixels() {
            let [l, ca, cb] = rgb_to_lab(pixel.0);
            lightness.put_pixel(x, y, Luma([l]));
            a.put_pixel(x, y, Luma([ca]));
            b.put_pixel(x, y, Luma([cb]));
        }

        Self { lightness, a, b }
    }

    /// Convert back to sRGB, clamped to [0, 1].
    pub fn to_rgb(&self) -> RgbBuffer {
        RgbBuffer::from_fn(self.lightness.width(), self.lightness.height(), |x, y| {
            Rgb(lab_to_rgb([
                self.lightness.get_pixel(x, y)[0],
                self.a.get_pixel(x, y)[0],
                self.b.get_pixel(x, y)[0],
            ]))
        })
    }

    /// Same chroma with a replaced lightness plane.
    pub fn with_lightness(&self, lightness: MaskBuffer) -> Self {
        Self {
            lightness,
            a: self.a.clone(),
            b: self.b.clone(),
        }
    }
}

/// Convert one sRGB triple to `[L, a, b]`.
pub fn rgb_to_lab(rgb: [f32; 3]) -> [f32; 3] {
    let lab = Lab::<D65, f32>::from_color(Srgb::new(rgb[0], rgb[1], rgb[2]));
    [lab.l, lab.a, lab.b]
}

/// Convert one `[L, a, b]` triple to sRGB, clamped to [0, 1].
pub fn lab_to_rgb(lab: [f32; 3]) -> [f32; 3] {
    let rgb = Srgb::<f32>::from_color(Lab::<D65, f32>::new(lab[0], lab[1], lab[2]));
    [rgb.red, rgb.green, rgb.blue].map(|c| c.clamp(0.0, 1.0))
}
