use super::overlap::OverlapReport;
use super::timing::TimingBreakdown;
use serde::Serialize;

/// One step of the left-to-right fold.
#[derive(Clone, Debug, Serialize)]
pub struct FoldStep {
    /// Index of the image appended in this step.
    pub index: usize,
    /// `[w, h]` of the panorama before the step.
    pub left_size: [usize; 2],
    pub right_size: [usize; 2],
    /// Overlap actually used for compositing.
    pub overlap: usize,
    pub blended: bool,
    pub output_size: [usize; 2],
    pub estimate: OverlapReport,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct StitchReport {
    pub images: usize,
    pub steps: Vec<FoldStep>,
    pub output_size: [usize; 2],
    pub timing: TimingBreakdown,
}
