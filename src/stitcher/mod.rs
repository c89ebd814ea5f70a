//! Left-to-right panorama assembly.
//!
//! The assembler folds over the input: the panorama built so far is always
//! the left operand, the next image the right one. Each step asks the
//! estimator for an overlap, clamps it to `min(w_left, w_right)` and
//! composites both images onto a fresh canvas.

pub mod composite;
pub mod concat;

pub use composite::{composite_pair, BlendOptions};
pub use concat::concatenate_horizontal;

use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{FoldStep, StitchReport};
use crate::error::StitchError;
use crate::image::ImageRgb;
use crate::overlap::{clamp_overlap, FeatureOverlapEstimator, OverlapEstimator};
use log::debug;
use std::borrow::Cow;
use std::time::Instant;

pub struct PanoramaAssembler<E = FeatureOverlapEstimator> {
    estimator: E,
    blend: BlendOptions,
}

impl Default for PanoramaAssembler {
    fn default() -> Self {
        Self::new(FeatureOverlapEstimator::default())
    }
}

impl<E: OverlapEstimator> PanoramaAssembler<E> {
    pub fn new(estimator: E) -> Self {
        Self {
            estimator,
            blend: BlendOptions::default(),
        }
    }

    pub fn with_blend(mut self, blend: BlendOptions) -> Self {
        self.blend = blend;
        self
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn blend(&self) -> &BlendOptions {
        &self.blend
    }

    /// Stitch `images` left to right.
    ///
    /// A single image is returned borrowed, untouched. An empty slice is
    /// rejected with [`StitchError::InvalidInput`].
    pub fn stitch<'a>(&self, images: &'a [ImageRgb]) -> Result<Cow<'a, ImageRgb>, StitchError> {
        self.stitch_with_report(images).map(|(panorama, _)| panorama)
    }

    pub fn stitch_with_report<'a>(
        &self,
        images: &'a [ImageRgb],
    ) -> Result<(Cow<'a, ImageRgb>, StitchReport), StitchError> {
        let t0 = Instant::now();
        let (first, rest) = images
            .split_first()
            .ok_or_else(|| StitchError::InvalidInput("no images to stitch".to_string()))?;

        let mut report = StitchReport {
            images: images.len(),
            ..StitchReport::default()
        };
        let mut panorama = Cow::Borrowed(first);
        for (i, next) in rest.iter().enumerate() {
            let step_start = Instant::now();
            let estimate = self.estimator.estimate(&panorama, next);
            let overlap = clamp_overlap(estimate.overlap, &panorama, next);
            let canvas = composite_pair(&panorama, next, overlap, &self.blend);
            debug!(
                "stitch step {}: {}x{} + {}x{} overlap {} ({:?}) -> {}x{}",
                i + 1,
                panorama.w,
                panorama.h,
                next.w,
                next.h,
                overlap,
                estimate.strategy,
                canvas.w,
                canvas.h
            );
            report.steps.push(FoldStep {
                index: i + 1,
                left_size: [panorama.w, panorama.h],
                right_size: [next.w, next.h],
                overlap,
                blended: composite::is_single_row(&panorama, next),
                output_size: [canvas.w, canvas.h],
                estimate,
            });
            report.timing.push(format!("step_{}", i + 1), elapsed_ms(step_start));
            panorama = Cow::Owned(canvas);
        }
        report.output_size = [panorama.w, panorama.h];
        report.timing.total_ms = elapsed_ms(t0);
        Ok((panorama, report))
    }
}
