//! Serializable reports describing what the estimators and the assembler
//! decided. Nothing here affects results; the structures only record them so
//! the tools can dump them as JSON.

pub mod overlap;
pub mod stitch;
pub mod timing;

pub use overlap::{FallbackKind, FallbackReason, OverlapReport, Strategy};
pub use stitch::{FoldStep, StitchReport};
pub use timing::{StageTiming, TimingBreakdown};
