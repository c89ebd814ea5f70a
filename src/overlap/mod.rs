//! Overlap estimation between a left and a right image.
//!
//! An estimator answers one question: how many of the left image's last
//! columns show the same scene as the right image's first columns. Every
//! implementation must return a value in `0..=min(w1, w2)`; weak or
//! contradictory evidence resolves to a conservative number, never an error.

pub mod feature;
pub mod pixel;

pub use feature::{FeatureOverlapEstimator, FeatureOverlapOptions};
pub use pixel::{PixelCorrelationEstimator, PixelOutcome, PixelOverlapOptions};

use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{OverlapReport, Strategy};
use crate::image::ImageRgb;
use std::time::Instant;

pub trait OverlapEstimator {
    fn find_overlap(&self, image1: &ImageRgb, image2: &ImageRgb) -> usize;

    /// Overlap plus a record of how it was obtained.
    fn estimate(&self, image1: &ImageRgb, image2: &ImageRgb) -> OverlapReport {
        let t0 = Instant::now();
        let mut report = OverlapReport::new(Strategy::Custom);
        report.overlap = clamp_overlap(self.find_overlap(image1, image2), image1, image2);
        report.timing.total_ms = elapsed_ms(t0);
        report
    }
}

impl<E: OverlapEstimator + ?Sized> OverlapEstimator for &E {
    fn find_overlap(&self, image1: &ImageRgb, image2: &ImageRgb) -> usize {
        (**self).find_overlap(image1, image2)
    }

    fn estimate(&self, image1: &ImageRgb, image2: &ImageRgb) -> OverlapReport {
        (**self).estimate(image1, image2)
    }
}

impl<E: OverlapEstimator + ?Sized> OverlapEstimator for Box<E> {
    fn find_overlap(&self, image1: &ImageRgb, image2: &ImageRgb) -> usize {
        (**self).find_overlap(image1, image2)
    }

    fn estimate(&self, image1: &ImageRgb, image2: &ImageRgb) -> OverlapReport {
        (**self).estimate(image1, image2)
    }
}

/// Largest admissible overlap for a pair, `min(w1, w2)`.
#[inline]
pub fn max_overlap(image1: &ImageRgb, image2: &ImageRgb) -> usize {
    image1.w.min(image2.w)
}

#[inline]
pub fn clamp_overlap(overlap: usize, image1: &ImageRgb, image2: &ImageRgb) -> usize {
    overlap.min(max_overlap(image1, image2))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(usize);

    impl OverlapEstimator for Fixed {
        fn find_overlap(&self, _: &ImageRgb, _: &ImageRgb) -> usize {
            self.0
        }
    }

    #[test]
    fn default_estimate_clamps_and_tags_custom() {
        let a = ImageRgb::new(12, 2);
        let b = ImageRgb::new(8, 2);
        let report = Fixed(50).estimate(&a, &b);
        assert_eq!(report.overlap, 8);
        assert_eq!(report.strategy, Strategy::Custom);
        assert!(report.fallback.is_none());
    }

    #[test]
    fn boxed_and_borrowed_estimators_forward() {
        let a = ImageRgb::new(12, 2);
        let boxed: Box<dyn OverlapEstimator> = Box::new(Fixed(5));
        assert_eq!(boxed.find_overlap(&a, &a), 5);
        assert_eq!((&Fixed(3)).estimate(&a, &a).overlap, 3);
    }
}
