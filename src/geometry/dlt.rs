//! Normalised direct linear transform for homographies.
//!
//! Both point sets are translated to their centroid and scaled so the mean
//! distance from it is `sqrt(2)`. The stacked 2n×9 system is solved through
//! the eigenvector of `AᵀA` with the smallest eigenvalue, then the
//! normalisation is undone.
use super::homography::is_degenerate;
use crate::features::AssociatedPair;
use nalgebra::{Matrix3, SMatrix, SVector, SymmetricEigen};

const EPS: f64 = 1e-12;

/// Estimate `H` with `p2 ~ H · p1` from at least four correspondences.
pub fn estimate_homography_dlt(pairs: &[&AssociatedPair]) -> Option<Matrix3<f64>> {
    if pairs.len() < 4 {
        return None;
    }
    let t1 = normalization(pairs.iter().map(|p| p.p1))?;
    let t2 = normalization(pairs.iter().map(|p| p.p2))?;

    let mut ata = SMatrix::<f64, 9, 9>::zeros();
    for pair in pairs {
        let [x, y] = apply_affine(&t1, pair.p1);
        let [u, v] = apply_affine(&t2, pair.p2);
        let r1 = SVector::<f64, 9>::from_column_slice(&[
            -x,
            -y,
            -1.0,
            0.0,
            0.0,
            0.0,
            u * x,
            u * y,
            u,
        ]);
        let r2 = SVector::<f64, 9>::from_column_slice(&[
            0.0,
            0.0,
            0.0,
            -x,
            -y,
            -1.0,
            v * x,
            v * y,
            v,
        ]);
        ata += r1 * r1.transpose() + r2 * r2.transpose();
    }

    let eig = SymmetricEigen::new(ata);
    let (min_idx, _) = eig
        .eigenvalues
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))?;
    let h = eig.eigenvectors.column(min_idx);
    let hn = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]);

    let mut out = t2.try_inverse()? * hn * t1;
    let s = if out[(2, 2)].abs() > EPS {
        out[(2, 2)]
    } else {
        out.norm()
    };
    out /= s;
    (!is_degenerate(&out)).then_some(out)
}

/// Similarity transform moving the centroid to the origin with mean radius
/// `sqrt(2)`. `None` when all points coincide.
fn normalization(points: impl Iterator<Item = [f64; 2]> + Clone) -> Option<Matrix3<f64>> {
    let n = points.clone().count() as f64;
    let (sx, sy) = points
        .clone()
        .fold((0.0, 0.0), |acc, p| (acc.0 + p[0], acc.1 + p[1]));
    let (cx, cy) = (sx / n, sy / n);
    let mean_dist = points
        .map(|p| ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if !mean_dist.is_finite() || mean_dist <= EPS {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    Some(Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0))
}

#[inline]
fn apply_affine(t: &Matrix3<f64>, p: [f64; 2]) -> [f64; 2] {
    [
        t[(0, 0)] * p[0] + t[(0, 1)] * p[1] + t[(0, 2)],
        t[(1, 0)] * p[0] + t[(1, 1)] * p[1] + t[(1, 2)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::homography::apply_homography_point;

    fn pairs_for(h: &Matrix3<f64>, pts: &[[f64; 2]]) -> Vec<AssociatedPair> {
        pts.iter()
            .map(|&p| AssociatedPair::new(p, apply_homography_point(h, p).unwrap()))
            .collect()
    }

    #[test]
    fn recovers_a_pure_translation() {
        let truth = Matrix3::new(1.0, 0.0, -80.0, 0.0, 1.0, 2.0, 0.0, 0.0, 1.0);
        let pts = [[90.0, 10.0], [150.0, 20.0], [120.0, 90.0], [95.0, 70.0], [140.0, 55.0]];
        let pairs = pairs_for(&truth, &pts);
        let refs: Vec<&AssociatedPair> = pairs.iter().collect();
        let h = estimate_homography_dlt(&refs).expect("well-posed system");
        assert!((h - truth).norm() < 1e-6, "estimated {h}");
    }

    #[test]
    fn recovers_a_projective_map_from_four_points() {
        let truth = Matrix3::new(0.9, 0.05, 12.0, -0.02, 1.1, -4.0, 1e-4, -2e-4, 1.0);
        let pts = [[0.0, 0.0], [200.0, 5.0], [190.0, 150.0], [10.0, 160.0]];
        let pairs = pairs_for(&truth, &pts);
        let refs: Vec<&AssociatedPair> = pairs.iter().collect();
        let h = estimate_homography_dlt(&refs).expect("four points in general position");
        for p in pts {
            let a = apply_homography_point(&h, p).unwrap();
            let b = apply_homography_point(&truth, p).unwrap();
            assert!((a[0] - b[0]).abs() < 1e-6 && (a[1] - b[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn coincident_points_are_rejected() {
        let pair = AssociatedPair::new([5.0, 5.0], [6.0, 6.0]);
        let refs = vec![&pair; 4];
        assert!(estimate_homography_dlt(&refs).is_none());
        assert!(estimate_homography_dlt(&refs[..3]).is_none());
    }
}
