use serde::Deserialize;

/// Knobs for the FAST + BRIEF detector.
///
/// Defaults favour recall: a low segment-test threshold on the equalised
/// image and a generous feature cap, since stitching seams often lack
/// strong corners.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Intensity difference for the segment test (8-bit units).
    pub threshold: u8,
    /// Contiguous arc length, clamped to `9..=12`.
    pub arc_length: usize,
    /// Window radius for non-maximum suppression (0 disables it).
    pub nms_radius: usize,
    /// Maximum number of keypoints kept per image (0 keeps all).
    pub max_features: usize,
    /// Seed of the BRIEF sampling pattern.
    pub descriptor_seed: u64,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            threshold: 10,
            arc_length: 9,
            nms_radius: 1,
            max_features: 1500,
            descriptor_seed: 0x5EED_B41E,
        }
    }
}

/// Greedy association filters.
///
/// - `backwards_validation`: keep a pair only when it is the mutual best.
/// - `ratio_threshold`: best/second-best distance ratio; `1.0` disables it.
/// - `max_distance`: reject pairs whose Hamming distance exceeds the value.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AssociationOptions {
    pub backwards_validation: bool,
    pub ratio_threshold: f32,
    pub max_distance: Option<u32>,
}

impl Default for AssociationOptions {
    fn default() -> Self {
        Self {
            backwards_validation: true,
            ratio_threshold: 1.0,
            max_distance: None,
        }
    }
}
