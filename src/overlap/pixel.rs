//! Brightness heuristic plus a brute-force, tolerance based seam scan.
//!
//! Decision order:
//! 1. If the right image is noticeably darker than the left one (mean channel
//!    value below `brightness_ratio` of the left mean) the answer is half the
//!    left width.
//! 2. Otherwise candidate widths `o = min(w1, w2) ..= 1` are tried from the
//!    widest down. A candidate passes when every pixel pair of the left
//!    image's last `o` columns and the right image's first `o` columns (rows
//!    shared by both images) agrees within `tolerance` on each channel.
//!    Pairs in which both pixels are dark are ignored. The first passing
//!    candidate again yields half the left width, not `o`.
//! 3. Nothing passes: 0.
//!
//! Half-width answers are capped at `min(w1, w2)`.

use super::{max_overlap, OverlapEstimator};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{OverlapReport, Strategy};
use crate::image::{ImageRgb, ImageView, Rgb};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PixelOverlapOptions {
    /// Maximum per-channel difference for matching pixels.
    pub tolerance: u8,
    /// Pixels whose channels are all below this value count as dark.
    pub dark_threshold: u8,
    pub brightness_ratio: f64,
}

impl Default for PixelOverlapOptions {
    fn default() -> Self {
        Self {
            tolerance: 30,
            dark_threshold: 16,
            brightness_ratio: 0.9,
        }
    }
}

/// Which rule decided a pixel-correlation estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PixelOutcome {
    BrightnessDrop { mean1: f64, mean2: f64 },
    SeamMatch { matched_width: usize },
    NoMatch,
}

#[derive(Clone, Debug, Default)]
pub struct PixelCorrelationEstimator {
    options: PixelOverlapOptions,
}

impl PixelCorrelationEstimator {
    pub fn new(options: PixelOverlapOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PixelOverlapOptions {
        &self.options
    }

    pub fn decide(&self, image1: &ImageRgb, image2: &ImageRgb) -> PixelOutcome {
        let mean1 = image1.mean_brightness();
        let mean2 = image2.mean_brightness();
        if mean2 < mean1 * self.options.brightness_ratio {
            debug!("pixel overlap: brightness drop {mean1:.1} -> {mean2:.1}");
            return PixelOutcome::BrightnessDrop { mean1, mean2 };
        }

        let widest = max_overlap(image1, image2);
        let matched = (1..widest + 1)
            .into_par_iter()
            .rev()
            .find_first(|&o| self.seam_matches(image1, image2, o));
        match matched {
            Some(matched_width) => {
                debug!("pixel overlap: seam matches at {matched_width} columns");
                PixelOutcome::SeamMatch { matched_width }
            }
            None => {
                debug!("pixel overlap: no candidate in 1..={widest}");
                PixelOutcome::NoMatch
            }
        }
    }

    /// Overlap implied by an outcome for this pair.
    pub fn resolve(outcome: &PixelOutcome, image1: &ImageRgb, image2: &ImageRgb) -> usize {
        match outcome {
            PixelOutcome::BrightnessDrop { .. } | PixelOutcome::SeamMatch { .. } => {
                (image1.w / 2).min(max_overlap(image1, image2))
            }
            PixelOutcome::NoMatch => 0,
        }
    }

    fn seam_matches(&self, image1: &ImageRgb, image2: &ImageRgb, o: usize) -> bool {
        let rows = image1.h.min(image2.h);
        let start = image1.w - o;
        (0..rows).all(|y| {
            let left = &image1.row(y)[start..];
            let right = &image2.row(y)[..o];
            left.iter().zip(right).all(|(&a, &b)| self.pixels_agree(a, b))
        })
    }

    #[inline]
    fn pixels_agree(&self, a: Rgb, b: Rgb) -> bool {
        let dark = |p: Rgb| p.iter().all(|&c| c < self.options.dark_threshold);
        if dark(a) && dark(b) {
            return true;
        }
        a.iter()
            .zip(b.iter())
            .all(|(&ca, &cb)| ca.abs_diff(cb) <= self.options.tolerance)
    }
}

impl OverlapEstimator for PixelCorrelationEstimator {
    fn find_overlap(&self, image1: &ImageRgb, image2: &ImageRgb) -> usize {
        Self::resolve(&self.decide(image1, image2), image1, image2)
    }

    fn estimate(&self, image1: &ImageRgb, image2: &ImageRgb) -> OverlapReport {
        let t0 = Instant::now();
        let outcome = self.decide(image1, image2);
        let mut report = OverlapReport::new(Strategy::PixelCorrelation);
        report.overlap = Self::resolve(&outcome, image1, image2);
        report.pixel = Some(outcome);
        report.timing.total_ms = elapsed_ms(t0);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> PixelCorrelationEstimator {
        PixelCorrelationEstimator::default()
    }

    #[test]
    fn darker_right_image_yields_half_width() {
        let a = ImageRgb::filled(40, 4, [200, 200, 200]);
        let b = ImageRgb::filled(40, 4, [100, 100, 100]);
        let est = estimator();
        assert!(matches!(est.decide(&a, &b), PixelOutcome::BrightnessDrop { .. }));
        assert_eq!(est.find_overlap(&a, &b), 20);
    }

    #[test]
    fn matching_seam_yields_half_width_not_match_width() {
        // Left ends in 6 grey columns, right starts with them.
        let a = ImageRgb::from_fn(30, 3, |x, _| {
            if x >= 24 {
                [120, 120, 120]
            } else {
                [250, 10, 10]
            }
        });
        let b = ImageRgb::from_fn(20, 3, |x, _| {
            if x < 6 {
                [125, 118, 121]
            } else {
                [10, 250, 10]
            }
        });
        let est = estimator();
        assert_eq!(est.decide(&a, &b), PixelOutcome::SeamMatch { matched_width: 6 });
        assert_eq!(est.find_overlap(&a, &b), 15);
    }

    #[test]
    fn dissimilar_images_yield_zero() {
        let a = ImageRgb::filled(10, 2, [255, 0, 0]);
        let b = ImageRgb::filled(10, 2, [0, 0, 255]);
        assert_eq!(estimator().decide(&a, &b), PixelOutcome::NoMatch);
        assert_eq!(estimator().find_overlap(&a, &b), 0);
    }

    #[test]
    fn dark_pixel_pairs_are_ignored() {
        let white = [255, 255, 255];
        let a = ImageRgb::from_fn(8, 2, |x, _| if x == 7 { [5, 0, 15] } else { white });
        let b = ImageRgb::from_fn(8, 2, |x, _| if x == 0 { [15, 15, 0] } else { white });
        assert_eq!(
            estimator().decide(&a, &b),
            PixelOutcome::SeamMatch { matched_width: 1 }
        );
    }

    #[test]
    fn half_width_is_capped_by_narrow_right_image() {
        let a = ImageRgb::filled(40, 2, [200, 200, 200]);
        let b = ImageRgb::filled(6, 2, [200, 200, 200]);
        assert_eq!(estimator().find_overlap(&a, &b), 6);
    }

    #[test]
    fn empty_images_yield_zero() {
        let a = ImageRgb::new(0, 0);
        let b = ImageRgb::filled(5, 5, [9, 9, 9]);
        assert_eq!(estimator().find_overlap(&a, &b), 0);
        assert_eq!(estimator().find_overlap(&b, &a), 0);
    }
}
