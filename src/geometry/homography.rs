//! Projective point transfer and inversion for 3×3 homographies.
use crate::features::AssociatedPair;
use nalgebra::{Matrix3, Vector3};

const EPS: f64 = 1e-12;
/// Determinant floor for a Frobenius-normalised matrix.
const SINGULAR_DET: f64 = 1e-10;

/// Map `p` through `h`. Returns `None` for points sent to infinity.
pub fn apply_homography_point(h: &Matrix3<f64>, p: [f64; 2]) -> Option<[f64; 2]> {
    let v = h * Vector3::new(p[0], p[1], 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

pub fn apply_homography_points(h: &Matrix3<f64>, pts: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    pts.iter().map(|&p| apply_homography_point(h, p)).collect()
}

/// `true` when `h` holds non-finite entries or is (numerically) rank deficient.
pub fn is_degenerate(h: &Matrix3<f64>) -> bool {
    if h.iter().any(|v| !v.is_finite()) {
        return true;
    }
    let scale = h.norm();
    if scale <= EPS {
        return true;
    }
    let det = (h / scale).determinant();
    !det.is_finite() || det.abs() < SINGULAR_DET
}

/// Inverse homography, or `None` when `h` is singular.
pub fn invert_homography(h: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    if is_degenerate(h) {
        return None;
    }
    let scale = h.norm();
    let inv = (h / scale).try_inverse()?;
    inv.iter().all(|v| v.is_finite()).then_some(inv)
}

/// Euclidean distance between `h · p1` and `p2`; infinite when `p1` maps to
/// infinity.
pub fn transfer_error(h: &Matrix3<f64>, pair: &AssociatedPair) -> f64 {
    match apply_homography_point(h, pair.p1) {
        Some(q) => ((q[0] - pair.p2[0]).powi(2) + (q[1] - pair.p2[1]).powi(2)).sqrt(),
        None => f64::INFINITY,
    }
}

/// Row-major copy, scaled so that `h[2][2] == 1` when possible.
pub fn to_rows(h: &Matrix3<f64>) -> [[f64; 3]; 3] {
    let s = if h[(2, 2)].abs() > EPS { h[(2, 2)] } else { 1.0 };
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = h[(i, j)] / s;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_round_trips_through_its_inverse() {
        let h = Matrix3::new(1.0, 0.0, -120.0, 0.0, 1.0, 3.0, 0.0, 0.0, 1.0);
        let inv = invert_homography(&h).expect("translation is invertible");
        let p = apply_homography_point(&inv, [0.0, 10.0]).unwrap();
        assert!((p[0] - 120.0).abs() < 1e-9 && (p[1] - 7.0).abs() < 1e-9, "{p:?}");
    }

    #[test]
    fn singular_matrices_are_rejected() {
        let rank_two = Matrix3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0);
        assert!(invert_homography(&rank_two).is_none());
        assert!(invert_homography(&Matrix3::zeros()).is_none());
        let nan = Matrix3::new(f64::NAN, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert!(invert_homography(&nan).is_none());
    }

    #[test]
    fn points_at_infinity_are_reported() {
        let h = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0);
        assert!(apply_homography_point(&h, [0.0, 5.0]).is_none());
        assert!(apply_homography_points(&h, &[[1.0, 1.0], [0.0, 1.0]]).is_none());
    }

    #[test]
    fn rows_are_normalised_by_the_last_entry() {
        let h = Matrix3::new(2.0, 0.0, -240.0, 0.0, 2.0, 6.0, 0.0, 0.0, 2.0);
        let rows = to_rows(&h);
        assert_eq!(rows[0], [1.0, 0.0, -120.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn transfer_error_measures_pixel_distance() {
        let h = Matrix3::identity();
        let pair = AssociatedPair::new([1.0, 1.0], [4.0, 5.0]);
        assert!((transfer_error(&h, &pair) - 5.0).abs() < 1e-12);
    }
}
