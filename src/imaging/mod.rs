//! Reusable image filters on float buffers.
//!
//! - Gaussian smoothing of masks and RGB buffers
//! - Canny edge maps
//! - CIE-Lab conversion
//! - CLAHE

pub mod blur;
pub mod clahe;
pub mod edges;
pub mod lab;

pub use blur::{gaussian_mask, gaussian_rgb};
pub use edges::canny;
pub use lab::LabImage;
