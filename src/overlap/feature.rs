//! Feature based overlap: equalise, detect and describe, associate, fit a
//! homography, and read the overlap off the right image's projected left edge.
//!
//! The fitted homography maps left-image points onto right-image points, so
//! its inverse carries the right image's column `x = 0` into the left frame.
//! Any failed stage hands the pair to [`PixelCorrelationEstimator`], with one
//! exception: too few correspondences is a direct answer of 0.

use super::pixel::{PixelCorrelationEstimator, PixelOverlapOptions};
use super::{max_overlap, OverlapEstimator};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{FallbackReason, OverlapReport, Strategy};
use crate::enhance::{equalize_local, DEFAULT_TILE_SIZE};
use crate::features::{
    associated_pairs, AssociationOptions, DetectDescribe, DetectorOptions, FastBrief,
    GreedyAssociator, Keypoint,
};
use crate::geometry::homography::to_rows;
use crate::geometry::{
    apply_homography_points, fit_homography_ransac, invert_homography, RansacOptions,
};
use crate::image::ImageRgb;
use log::{debug, warn};
use serde::Deserialize;
use std::time::Instant;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FeatureOverlapOptions {
    /// Tile size of the local histogram equalisation.
    pub equalize_tile: usize,
    pub min_correspondences: usize,
    pub min_inliers: usize,
    /// Smallest overlap accepted from the projection.
    pub min_overlap: usize,
    /// Largest accepted overlap as a fraction of `min(w1, w2)`.
    pub max_overlap_ratio: f64,
    pub detector: DetectorOptions,
    pub association: AssociationOptions,
    pub ransac: RansacOptions,
    pub pixel: PixelOverlapOptions,
}

impl Default for FeatureOverlapOptions {
    fn default() -> Self {
        Self {
            equalize_tile: DEFAULT_TILE_SIZE,
            min_correspondences: 10,
            min_inliers: 10,
            min_overlap: 10,
            max_overlap_ratio: 0.9,
            detector: DetectorOptions::default(),
            association: AssociationOptions::default(),
            ransac: RansacOptions::default(),
            pixel: PixelOverlapOptions::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FeatureOverlapEstimator<D = FastBrief> {
    options: FeatureOverlapOptions,
    detector: D,
    associator: GreedyAssociator,
    fallback: PixelCorrelationEstimator,
}

impl Default for FeatureOverlapEstimator {
    fn default() -> Self {
        Self::new(FeatureOverlapOptions::default())
    }
}

impl FeatureOverlapEstimator {
    pub fn new(options: FeatureOverlapOptions) -> Self {
        let detector = FastBrief::new(options.detector.clone());
        Self::with_detector(options, detector)
    }
}

impl<D: DetectDescribe> FeatureOverlapEstimator<D> {
    /// Use a custom detector; `options.detector` is then ignored.
    pub fn with_detector(options: FeatureOverlapOptions, detector: D) -> Self {
        let associator = GreedyAssociator::new(options.association.clone());
        let fallback = PixelCorrelationEstimator::new(options.pixel.clone());
        Self {
            options,
            detector,
            associator,
            fallback,
        }
    }

    pub fn options(&self) -> &FeatureOverlapOptions {
        &self.options
    }

    fn describe(&self, image: &ImageRgb) -> Vec<Keypoint> {
        let gray = image.to_gray();
        let equalized = equalize_local(gray.as_view(), self.options.equalize_tile);
        self.detector.detect_describe(equalized.as_view())
    }

    fn fall_back(
        &self,
        mut report: OverlapReport,
        reason: FallbackReason,
        image1: &ImageRgb,
        image2: &ImageRgb,
    ) -> OverlapReport {
        debug!("feature overlap: falling back to pixel correlation ({reason:?})");
        let outcome = self.fallback.decide(image1, image2);
        report.overlap = PixelCorrelationEstimator::resolve(&outcome, image1, image2);
        report.strategy = Strategy::PixelCorrelation;
        report.fallback = Some(reason);
        report.pixel = Some(outcome);
        report
    }

    fn run(
        &self,
        image1: &ImageRgb,
        image2: &ImageRgb,
        report: &mut OverlapReport,
    ) -> Result<(), FallbackReason> {
        let opts = &self.options;
        let mut lap = Instant::now();

        let kp1 = self.describe(image1);
        let kp2 = self.describe(image2);
        report.keypoints = [kp1.len(), kp2.len()];
        lap = report.timing.lap("detect_describe", lap);
        if kp1.is_empty() || kp2.is_empty() {
            return Err(FallbackReason::NoDescriptors);
        }

        let desc1: Vec<_> = kp1.iter().map(|k| k.descriptor).collect();
        let desc2: Vec<_> = kp2.iter().map(|k| k.descriptor).collect();
        let matches = self.associator.associate(&desc1, &desc2);
        let pairs = associated_pairs(&matches, &kp1, &kp2);
        report.correspondences = pairs.len();
        lap = report.timing.lap("associate", lap);
        debug!(
            "feature overlap: keypoints {:?}, correspondences {}",
            report.keypoints,
            pairs.len()
        );
        if pairs.len() < opts.min_correspondences {
            debug!("feature overlap: too few correspondences, overlap 0");
            report.overlap = 0;
            return Ok(());
        }

        let fit =
            fit_homography_ransac(&pairs, &opts.ransac).ok_or(FallbackReason::FitFailed)?;
        report.inliers = fit.inliers.len();
        report.homography = Some(to_rows(&fit.model));
        lap = report.timing.lap("ransac", lap);
        if fit.inliers.len() < opts.min_inliers {
            return Err(FallbackReason::TooFewInliers {
                inliers: fit.inliers.len(),
            });
        }

        let inverse = invert_homography(&fit.model).ok_or_else(|| {
            warn!("feature overlap: homography is singular");
            FallbackReason::SingularHomography
        })?;
        let edge = [[0.0, 0.0], [0.0, image2.h.saturating_sub(1) as f64]];
        let projected = apply_homography_points(&inverse, &edge)
            .ok_or(FallbackReason::ProjectionAtInfinity)?;
        let avg_x = (projected[0][0] + projected[1][0]) / 2.0;
        report.projected_x = Some(avg_x);
        report.timing.lap("project", lap);

        let limit = max_overlap(image1, image2);
        let raw = (image1.w as f64 - avg_x).round();
        let overlap = if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(limit)
        };
        debug!("feature overlap: projected edge x={avg_x:.2}, overlap {overlap} of {limit}");
        if overlap < opts.min_overlap || overlap as f64 > opts.max_overlap_ratio * limit as f64 {
            return Err(FallbackReason::Implausible { overlap });
        }
        report.overlap = overlap;
        Ok(())
    }
}

impl<D: DetectDescribe> OverlapEstimator for FeatureOverlapEstimator<D> {
    fn find_overlap(&self, image1: &ImageRgb, image2: &ImageRgb) -> usize {
        self.estimate(image1, image2).overlap
    }

    fn estimate(&self, image1: &ImageRgb, image2: &ImageRgb) -> OverlapReport {
        let t0 = Instant::now();
        let mut report = OverlapReport::new(Strategy::Feature);
        let mut report = match self.run(image1, image2, &mut report) {
            Ok(()) => report,
            Err(reason) => self.fall_back(report, reason, image1, image2),
        };
        report.timing.total_ms = elapsed_ms(t0);
        report
    }
}
