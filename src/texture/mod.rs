//! Seamless texture tiling.
//!
//! [`TextureTiler`] turns one RGB image into a square tile whose opposite
//! edges join without a visible seam, plus a small preview. The pipeline is
//! fixed and linear; each stage consumes the whole output of the previous
//! one:
//!
//! 1. pre-processing ([`prefilter`]): gradient removal, light equalization,
//!    edge blur, edge fade, edge padding
//! 2. seam construction ([`seam`]): simple, mirror or rotate
//! 3. post-processing ([`postfilter`]): color correction, direction, repeat,
//!    detail
//! 4. resize to `tile_size` and preview ([`resize`])
//!
//! ```no_run
//! use seamweave::texture::{TextureTiler, TilerParams, PatternType};
//!
//! let image = seamweave::core::buffer::load("stone.png")?;
//! let tiler = TextureTiler::new(TilerParams {
//!     pattern_type: PatternType::Mirror,
//!     tile_size: 256,
//!     ..TilerParams::default()
//! })?;
//! let output = tiler.run(&image)?;
//! seamweave::core::buffer::save(&output.tile, "stone_tile.png")?;
//! # Ok::<(), seamweave::core::SeamweaveError>(())
//! ```

pub mod params;
pub mod postfilter;
pub mod prefilter;
pub mod resize;
pub mod seam;

pub use params::{Interpolation, PatternType, TextureDirection, TilerParams};
pub use resize::PREVIEW_SIZE;

use crate::core::buffer::{self, RgbBuffer};
use crate::core::error::TilerError;

/// Result of one tiling run.
#[derive(Debug, Clone, PartialEq)]
pub struct TileOutput {
    /// `tile_size x tile_size` seamless tile, samples in [0, 1].
    pub tile: RgbBuffer,
    /// `PREVIEW_SIZE x PREVIEW_SIZE` bilinear downscale of the tile.
    pub preview: RgbBuffer,
}

/// The tiling pipeline with a fixed parameter set.
#[derive(Debug, Clone, Default)]
pub struct TextureTiler {
    params: TilerParams,
}

impl TextureTiler {
    /// Create a tiler, rejecting parameters no stage can work with.
    pub fn new(params: TilerParams) -> Result<Self, TilerError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters this tiler runs with.
    pub fn params(&self) -> &TilerParams {
        &self.params
    }

    /// Stage 1.
    pub fn preprocess(&self, image: &RgbBuffer) -> RgbBuffer {
        prefilter::apply(image, &self.params)
    }

    /// Stage 2.
    pub fn build_seam(&self, image: &RgbBuffer) -> RgbBuffer {
        match self.params.pattern_type {
            PatternType::Simple => seam::simple(image, self.params.overlap),
            PatternType::Mirror => seam::mirror(image),
            PatternType::Rotate => seam::rotate(image, self.params.overlap),
        }
    }

    /// Stage 3.
    pub fn postprocess(&self, image: &RgbBuffer) -> RgbBuffer {
        postfilter::apply(image, &self.params)
    }

    /// Run all four stages.
    pub fn run(&self, image: &RgbBuffer) -> Result<TileOutput, TilerError> {
        buffer::ensure_non_empty(image)?;
        log::debug!(
            "tiling {}x{} image ({} pattern, tile {})",
            image.width(),
            image.height(),
            self.params.pattern_type,
            self.params.tile_size
        );

        let prepared = self.preprocess(image);
        let seamless = self.build_seam(&prepared);
        log::debug!("seam canvas {}x{}", seamless.width(), seamless.height());
        let finished = self.postprocess(&seamless);

        let tile = resize::resize_square(&finished, self.params.tile_size, self.params.interpolation);
        let preview = resize::preview(&tile);
        Ok(TileOutput { tile, preview })
    }

    /// Run on a flat sample array (`(H, W, 3)`, `(3, H, W)`, optionally with
    /// leading batch axes of one).
    pub fn run_tensor(&self, shape: &[usize], data: &[f32]) -> Result<TileOutput, TilerError> {
        let image = buffer::from_tensor(shape, data)?;
        self.run(&image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::BufferError;
    use image::Rgb;

    fn tiler(params: TilerParams) -> TextureTiler {
        TextureTiler::new(params).unwrap()
    }

    #[test]
    fn test_constant_gray_end_to_end() {
        let _ = env_logger::builder().is_test(true).try_init();
        let image = RgbBuffer::from_pixel(64, 64, Rgb([0.5, 0.5, 0.5]));
        let output = tiler(TilerParams {
            overlap: 8,
            tile_size: 128,
            ..TilerParams::default()
        })
        .run(&image)
        .unwrap();

        assert_eq!(output.tile.dimensions(), (128, 128));
        assert_eq!(output.preview.dimensions(), (PREVIEW_SIZE, PREVIEW_SIZE));
        for p in output.tile.pixels() {
            for c in 0..3 {
                assert!((p[c] - 0.5).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_tiny_input_overlap_is_clamped() {
        let image = RgbBuffer::from_fn(8, 8, |x, y| Rgb([x as f32 / 8.0, y as f32 / 8.0, 0.3]));
        let output = tiler(TilerParams {
            overlap: 64,
            tile_size: 64,
            ..TilerParams::default()
        })
        .run(&image)
        .unwrap();
        assert_eq!(output.tile.dimensions(), (64, 64));
    }

    #[test]
    fn test_every_pattern_and_direction() {
        let image = RgbBuffer::from_fn(24, 16, |x, y| {
            Rgb([x as f32 / 24.0, y as f32 / 16.0, ((x * y) % 7) as f32 / 7.0])
        });
        for pattern in PatternType::ALL {
            for direction in TextureDirection::ALL {
                let output = tiler(TilerParams {
                    pattern_type: *pattern,
                    texture_direction: *direction,
                    repeat_count: 2,
                    tile_size: 64,
                    overlap: 4,
                    ..TilerParams::default()
                })
                .run(&image)
                .unwrap();
                assert_eq!(output.tile.dimensions(), (64, 64));
                assert!(output
                    .tile
                    .pixels()
                    .all(|p| p.0.iter().all(|v| (0.0..=1.0).contains(v))));
            }
        }
    }

    #[test]
    fn test_all_stages_enabled() {
        let image = RgbBuffer::from_fn(64, 48, |x, y| {
            Rgb([x as f32 / 64.0, y as f32 / 48.0, 0.4 + ((x + y) % 5) as f32 * 0.1])
        });
        let output = tiler(TilerParams {
            tile_size: 96,
            overlap: 16,
            detail_level: 1.5,
            edge_padding: 4,
            edge_blur: 50.0,
            edge_fade: 20.0,
            color_correction: true,
            light_equalization: 60.0,
            gradient_removal: 40.0,
            interpolation: Interpolation::Bicubic,
            ..TilerParams::default()
        })
        .run(&image)
        .unwrap();
        assert_eq!(output.tile.dimensions(), (96, 96));
    }

    #[test]
    fn test_mirror_canvas_before_resize() {
        let t = tiler(TilerParams {
            pattern_type: PatternType::Mirror,
            ..TilerParams::default()
        });
        let image = RgbBuffer::from_fn(10, 6, |x, _| Rgb([x as f32 / 10.0, 0.0, 0.0]));
        let canvas = t.postprocess(&t.build_seam(&t.preprocess(&image)));
        assert_eq!(canvas.dimensions(), (20, 12));
        for y in 0..12 {
            assert_eq!(canvas.get_pixel(9, y), canvas.get_pixel(10, y));
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(TextureTiler::new(TilerParams {
            tile_size: 0,
            ..TilerParams::default()
        })
        .is_err());

        let empty = RgbBuffer::new(0, 0);
        assert!(matches!(
            TextureTiler::default().run(&empty),
            Err(TilerError::Buffer(BufferError::Empty { .. }))
        ));

        assert!(matches!(
            TextureTiler::default().run_tensor(&[4, 4, 4], &[0.0; 64]),
            Err(TilerError::Buffer(BufferError::InvalidShape { .. }))
        ));
    }

    #[test]
    fn test_run_tensor_channel_first() {
        let data = vec![0.25f32; 3 * 16 * 16];
        let output = tiler(TilerParams {
            tile_size: 32,
            ..TilerParams::default()
        })
        .run_tensor(&[1, 3, 16, 16], &data)
        .unwrap();
        assert_eq!(output.tile.dimensions(), (32, 32));
    }
}
