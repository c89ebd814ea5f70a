//! Generic RANSAC with a seeded sampler, plus the homography model used by
//! overlap estimation.
use super::dlt::estimate_homography_dlt;
use super::homography::transfer_error;
use crate::features::AssociatedPair;
use log::debug;
use nalgebra::Matrix3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RansacOptions {
    pub max_iterations: usize,
    /// Maximum transfer error, in pixels, for a correspondence to count as an
    /// inlier.
    pub inlier_threshold: f64,
    pub seed: u64,
    /// Re-estimate from the full consensus set after sampling.
    pub refine: bool,
}

impl Default for RansacOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            inlier_threshold: 15.0,
            seed: 0x0BAD_CAFE,
            refine: true,
        }
    }
}

/// A model that can be estimated from minimal samples and scored per datum.
pub trait RobustModel<D> {
    type Model: Clone;

    fn min_sample_size(&self) -> usize;

    fn estimate(&self, data: &[&D]) -> Option<Self::Model>;

    fn error(&self, model: &Self::Model, datum: &D) -> f64;
}

#[derive(Clone, Debug)]
pub struct RobustFit<M> {
    pub model: M,
    /// Indices into the input data, ascending.
    pub inliers: Vec<usize>,
    pub mean_error: f64,
}

pub struct Ransac {
    options: RansacOptions,
}

impl Ransac {
    pub fn new(options: RansacOptions) -> Self {
        Self { options }
    }

    /// Best-supported model, or `None` when no sample produced one.
    pub fn run<D, E: RobustModel<D>>(&self, estimator: &E, data: &[D]) -> Option<RobustFit<E::Model>> {
        let n = data.len();
        let k = estimator.min_sample_size();
        if k == 0 || n < k || self.options.max_iterations == 0 {
            return None;
        }

        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let mut best: Option<RobustFit<E::Model>> = None;
        let mut sample: Vec<&D> = Vec::with_capacity(k);

        for _ in 0..self.options.max_iterations {
            sample.clear();
            sample.extend(rand::seq::index::sample(&mut rng, n, k).iter().map(|i| &data[i]));
            let Some(model) = estimator.estimate(&sample) else {
                continue;
            };
            let candidate = self.score(estimator, model, data);
            if is_better(&candidate, best.as_ref()) {
                best = Some(candidate);
                if best.as_ref().is_some_and(|b| b.inliers.len() == n) {
                    break;
                }
            }
        }

        let mut best = best?;
        if self.options.refine && best.inliers.len() > k {
            let consensus: Vec<&D> = best.inliers.iter().map(|&i| &data[i]).collect();
            if let Some(model) = estimator.estimate(&consensus) {
                let refined = self.score(estimator, model, data);
                if refined.inliers.len() >= best.inliers.len() {
                    best = refined;
                }
            }
        }
        (best.inliers.len() >= k).then_some(best)
    }

    fn score<D, E: RobustModel<D>>(&self, estimator: &E, model: E::Model, data: &[D]) -> RobustFit<E::Model> {
        let mut inliers = Vec::new();
        let mut total = 0.0;
        for (i, datum) in data.iter().enumerate() {
            let err = estimator.error(&model, datum);
            if err <= self.options.inlier_threshold {
                inliers.push(i);
                total += err;
            }
        }
        let mean_error = if inliers.is_empty() {
            f64::INFINITY
        } else {
            total / inliers.len() as f64
        };
        RobustFit {
            model,
            inliers,
            mean_error,
        }
    }
}

fn is_better<M>(candidate: &RobustFit<M>, best: Option<&RobustFit<M>>) -> bool {
    match best {
        None => !candidate.inliers.is_empty(),
        Some(b) => {
            candidate.inliers.len() > b.inliers.len()
                || (candidate.inliers.len() == b.inliers.len() && candidate.mean_error < b.mean_error)
        }
    }
}

/// Four-point homography model over correspondences, `p2 ~ H · p1`.
pub struct HomographyModel;

impl RobustModel<AssociatedPair> for HomographyModel {
    type Model = Matrix3<f64>;

    fn min_sample_size(&self) -> usize {
        4
    }

    fn estimate(&self, data: &[&AssociatedPair]) -> Option<Matrix3<f64>> {
        estimate_homography_dlt(data)
    }

    fn error(&self, model: &Matrix3<f64>, datum: &AssociatedPair) -> f64 {
        transfer_error(model, datum)
    }
}

/// Robust homography mapping image-1 points onto image-2 points.
pub fn fit_homography_ransac(
    pairs: &[AssociatedPair],
    options: &RansacOptions,
) -> Option<RobustFit<Matrix3<f64>>> {
    let fit = Ransac::new(options.clone()).run(&HomographyModel, pairs);
    match &fit {
        Some(f) => debug!(
            "ransac: {} / {} inliers, mean error {:.3}px",
            f.inliers.len(),
            pairs.len(),
            f.mean_error
        ),
        None => debug!("ransac: no model from {} correspondences", pairs.len()),
    }
    fit
}
