use super::timing::TimingBreakdown;
use crate::overlap::PixelOutcome;
use serde::Serialize;

/// Which estimator produced the final overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Feature,
    PixelCorrelation,
    /// A caller-provided estimator without its own report.
    Custom,
}

/// Why the feature path handed over to pixel correlation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    NoDescriptors,
    FitFailed,
    TooFewInliers { inliers: usize },
    SingularHomography,
    ProjectionAtInfinity,
    Implausible { overlap: usize },
}

/// Coarse classification of a [`FallbackReason`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    InsufficientEvidence,
    DegenerateGeometry,
    ImplausibleResult,
}

impl FallbackReason {
    pub fn kind(&self) -> FallbackKind {
        match self {
            Self::NoDescriptors | Self::FitFailed | Self::TooFewInliers { .. } => {
                FallbackKind::InsufficientEvidence
            }
            Self::SingularHomography | Self::ProjectionAtInfinity => {
                FallbackKind::DegenerateGeometry
            }
            Self::Implausible { .. } => FallbackKind::ImplausibleResult,
        }
    }
}

/// Outcome of one overlap estimate between a left and a right image.
#[derive(Clone, Debug, Serialize)]
pub struct OverlapReport {
    pub overlap: usize,
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
    /// Keypoints found in the left and right image.
    pub keypoints: [usize; 2],
    pub correspondences: usize,
    pub inliers: usize,
    /// Fitted homography (left to right), row-major with `h[2][2] == 1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homography: Option<[[f64; 3]; 3]>,
    /// Mean x of the right image's left edge projected into the left image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel: Option<PixelOutcome>,
    pub timing: TimingBreakdown,
}

impl OverlapReport {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            overlap: 0,
            strategy,
            fallback: None,
            keypoints: [0, 0],
            correspondences: 0,
            inliers: 0,
            homography: None,
            projected_x: None,
            pixel: None,
            timing: TimingBreakdown::default(),
        }
    }
}
