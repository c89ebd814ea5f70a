//! Keypoint detection, description and association.
//!
//! The overlap estimator only talks to the [`DetectDescribe`] trait and the
//! [`GreedyAssociator`]; [`FastBrief`] is the stock detector:
//! - FAST-9 segment test on the (already equalised) grayscale image,
//!   restricted to pixels whose descriptor patch fits inside the image;
//! - local non-maximum suppression and a strongest-N cap;
//! - upright BRIEF-256 on a binomially smoothed copy of the image.

pub mod associate;
pub mod brief;
pub mod fast;
pub mod nms;
mod options;

pub use associate::{associated_pairs, AssociatedIndex, AssociatedPair, GreedyAssociator};
pub use brief::{BinaryDescriptor, BriefExtractor};
pub use fast::{Corner, FastDetector};
pub use options::{AssociationOptions, DetectorOptions};

use crate::enhance::filters::{self, BINOMIAL_9TAP};
use crate::image::ImageU8;
use log::debug;

/// Detected location plus its descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub score: f32,
    pub descriptor: BinaryDescriptor,
}

/// Detection + description capability consumed by the feature estimator.
pub trait DetectDescribe {
    fn detect_describe(&self, gray: ImageU8<'_>) -> Vec<Keypoint>;
}

impl<T: DetectDescribe + ?Sized> DetectDescribe for &T {
    fn detect_describe(&self, gray: ImageU8<'_>) -> Vec<Keypoint> {
        (**self).detect_describe(gray)
    }
}

/// FAST corners described with BRIEF.
#[derive(Clone, Debug)]
pub struct FastBrief {
    options: DetectorOptions,
    fast: FastDetector,
    brief: BriefExtractor,
}

impl Default for FastBrief {
    fn default() -> Self {
        Self::new(DetectorOptions::default())
    }
}

impl FastBrief {
    pub fn new(options: DetectorOptions) -> Self {
        let fast = FastDetector::new(options.threshold, options.arc_length);
        let brief = BriefExtractor::new(options.descriptor_seed);
        Self {
            options,
            fast,
            brief,
        }
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }
}

impl DetectDescribe for FastBrief {
    fn detect_describe(&self, gray: ImageU8<'_>) -> Vec<Keypoint> {
        let raw = self.fast.detect(gray, brief::PATCH_RADIUS);
        let detected = raw.len();
        let mut corners = nms::suppress_non_maxima(raw, gray.w, gray.h, self.options.nms_radius);
        nms::keep_strongest(&mut corners, self.options.max_features);
        if corners.is_empty() {
            debug!("FastBrief: no corners in {}x{} image", gray.w, gray.h);
            return Vec::new();
        }
        let smoothed = filters::apply(&BINOMIAL_9TAP, gray);
        let keypoints = self.brief.describe(&smoothed, &corners);
        debug!(
            "FastBrief: {}x{} detected={} kept={}",
            gray.w,
            gray.h,
            detected,
            keypoints.len()
        );
        keypoints
    }
}
