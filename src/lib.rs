#![doc = include_str!("../README.md")]

// Public modules
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod overlap;
pub mod stitcher;

// Building blocks of the feature path; public for tools and custom estimators.
pub mod config;
pub mod enhance;
pub mod features;
pub mod geometry;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::StitchError;
pub use crate::image::ImageRgb;
pub use crate::overlap::{FeatureOverlapEstimator, OverlapEstimator, PixelCorrelationEstimator};
pub use crate::stitcher::{BlendOptions, PanoramaAssembler};

pub use crate::diagnostics::{OverlapReport, StitchReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use pano_stitch::prelude::*;
///
/// let left = ImageRgb::filled(4, 3, [255, 0, 0]);
/// let right = ImageRgb::filled(4, 3, [0, 0, 255]);
/// let images = [left, right];
/// let panorama = PanoramaAssembler::new(PixelCorrelationEstimator::default())
///     .stitch(&images)
///     .unwrap();
/// assert_eq!((panorama.w, panorama.h), (8, 3));
/// ```
pub mod prelude {
    pub use crate::image::{ImageRgb, ImageU8, ImageView};
    pub use crate::{
        FeatureOverlapEstimator, OverlapEstimator, PanoramaAssembler, PixelCorrelationEstimator,
        StitchError,
    };
}
