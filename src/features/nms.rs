//! Non-maximum suppression for segment-test corners.
//!
//! Suppression is purely local (a square window around each corner), so the
//! surviving set does not depend on where an image was cropped.

use super::fast::Corner;

/// Keep corners whose score is maximal within `radius` pixels.
///
/// Equal scores are resolved in raster order: the earlier corner survives.
pub fn suppress_non_maxima(corners: Vec<Corner>, w: usize, h: usize, radius: usize) -> Vec<Corner> {
    if radius == 0 || corners.is_empty() {
        return corners;
    }
    let mut grid = vec![f32::NEG_INFINITY; w * h];
    for c in &corners {
        grid[c.y * w + c.x] = c.score;
    }
    corners
        .into_iter()
        .filter(|c| {
            let y0 = c.y.saturating_sub(radius);
            let y1 = (c.y + radius).min(h - 1);
            let x0 = c.x.saturating_sub(radius);
            let x1 = (c.x + radius).min(w - 1);
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    if (nx, ny) == (c.x, c.y) {
                        continue;
                    }
                    let s = grid[ny * w + nx];
                    if s > c.score || (s == c.score && (ny, nx) < (c.y, c.x)) {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

/// Retain at most `max` corners, strongest first. `0` keeps everything.
pub fn keep_strongest(corners: &mut Vec<Corner>, max: usize) {
    if max == 0 || corners.len() <= max {
        return;
    }
    corners.sort_by(|a, b| b.score.total_cmp(&a.score));
    corners.truncate(max);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(x: usize, y: usize, score: f32) -> Corner {
        Corner { x, y, score }
    }

    #[test]
    fn weaker_neighbours_are_suppressed() {
        let corners = vec![corner(5, 5, 10.0), corner(6, 5, 20.0), corner(9, 9, 1.0)];
        let kept = suppress_non_maxima(corners, 16, 16, 1);
        assert_eq!(kept, vec![corner(6, 5, 20.0), corner(9, 9, 1.0)]);
    }

    #[test]
    fn ties_keep_the_first_in_raster_order() {
        let corners = vec![corner(4, 4, 7.0), corner(5, 4, 7.0)];
        let kept = suppress_non_maxima(corners, 8, 8, 1);
        assert_eq!(kept, vec![corner(4, 4, 7.0)]);
    }

    #[test]
    fn strongest_corners_survive_the_cap() {
        let mut corners = vec![corner(0, 0, 1.0), corner(1, 0, 3.0), corner(2, 0, 2.0)];
        keep_strongest(&mut corners, 2);
        assert_eq!(corners, vec![corner(1, 0, 3.0), corner(2, 0, 2.0)]);
    }
}
