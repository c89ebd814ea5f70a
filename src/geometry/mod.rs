//! Projective geometry: homography estimation, robust fitting and transfer.
pub mod dlt;
pub mod homography;
pub mod ransac;

pub use dlt::estimate_homography_dlt;
pub use homography::{apply_homography_point, apply_homography_points, invert_homography, transfer_error};
pub use ransac::{fit_homography_ransac, HomographyModel, Ransac, RansacOptions, RobustFit, RobustModel};
