use crate::overlap::{FeatureOverlapOptions, PixelOverlapOptions};
use crate::stitcher::BlendOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// How adjacent images are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StitchMode {
    /// Estimate overlaps and composite.
    #[default]
    Blend,
    /// Side by side, overlap ignored.
    #[serde(alias = "concat")]
    Concatenate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    #[default]
    Feature,
    Pixel,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    pub panorama: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StitchToolConfig {
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub mode: StitchMode,
    #[serde(default)]
    pub estimator: EstimatorKind,
    #[serde(default)]
    pub feature: FeatureOverlapOptions,
    #[serde(default)]
    pub pixel: PixelOverlapOptions,
    #[serde(default)]
    pub blend: BlendOptions,
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<StitchToolConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<StitchToolConfig, String> {
    let config: StitchToolConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;
    if config.inputs.is_empty() {
        return Err("config lists no inputs".to_string());
    }
    Ok(config)
}
