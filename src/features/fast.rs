//! FAST-N segment test corner detector.
//!
//! Sixteen samples on a Bresenham circle of radius 3 are classified as
//! brighter or darker than the centre by more than `threshold`. A pixel is a
//! corner when `arc_length` contiguous samples (wrapping around) share one
//! class. Runs are found on a doubled 32-bit mask with repeated AND-shifts.

use crate::image::{ImageU8, ImageView};

/// Circle offsets, clockwise from 12 o'clock.
const CIRCLE: [(isize, isize); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

const CIRCLE_RADIUS: usize = 3;

/// Integer corner location with its segment-test score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    pub x: usize,
    pub y: usize,
    /// Sum of `|circle - centre| - threshold` over the best arc.
    pub score: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct FastDetector {
    pub threshold: u8,
    /// Required contiguous arc, kept within `9..=12`.
    pub arc_length: usize,
}

impl FastDetector {
    pub fn new(threshold: u8, arc_length: usize) -> Self {
        Self {
            threshold,
            arc_length: arc_length.clamp(9, 12),
        }
    }

    /// Detect corners at least `border` pixels away from every image edge.
    /// Results come back in raster order.
    pub fn detect(&self, image: ImageU8<'_>, border: usize) -> Vec<Corner> {
        let border = border.max(CIRCLE_RADIUS);
        let mut corners = Vec::new();
        if image.w <= 2 * border || image.h <= 2 * border {
            return corners;
        }

        let mut circle = [0i16; 16];
        for y in border..image.h - border {
            let row = image.row(y);
            for x in border..image.w - border {
                let center = row[x] as i16;
                for (slot, &(dx, dy)) in circle.iter_mut().zip(CIRCLE.iter()) {
                    let sx = (x as isize + dx) as usize;
                    let sy = (y as isize + dy) as usize;
                    *slot = image.get(sx, sy) as i16;
                }
                if let Some(score) = self.segment_test(center, &circle) {
                    corners.push(Corner { x, y, score });
                }
            }
        }
        corners
    }

    fn segment_test(&self, center: i16, circle: &[i16; 16]) -> Option<f32> {
        let thresh = self.threshold as i16;
        let mut bright: u16 = 0;
        let mut dark: u16 = 0;
        for (i, &v) in circle.iter().enumerate() {
            let diff = v - center;
            if diff > thresh {
                bright |= 1 << i;
            } else if diff < -thresh {
                dark |= 1 << i;
            }
        }

        let mut best: Option<f32> = None;
        for mask in [bright, dark] {
            if (mask.count_ones() as usize) < self.arc_length || !has_run(mask, self.arc_length) {
                continue;
            }
            let score = arc_score(center, circle, thresh, mask);
            best = Some(best.map_or(score, |b: f32| b.max(score)));
        }
        best
    }
}

fn has_run(mask: u16, n: usize) -> bool {
    let doubled = (mask as u32) | ((mask as u32) << 16);
    let mut acc = doubled;
    for _ in 1..n {
        acc &= acc >> 1;
    }
    acc != 0
}

/// Score the longest run of `mask`, wrapping around the circle.
fn arc_score(center: i16, circle: &[i16; 16], thresh: i16, mask: u16) -> f32 {
    let doubled = (mask as u32) | ((mask as u32) << 16);
    let (mut best_start, mut best_len) = (0usize, 0usize);
    let mut i = 0usize;
    while i < 16 {
        if doubled & (1 << i) == 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < 32 && doubled & (1 << i) != 0 {
            i += 1;
        }
        if i - start > best_len {
            best_len = i - start;
            best_start = start;
        }
    }
    (best_start..best_start + best_len.min(16))
        .map(|j| ((circle[j % 16] - center).abs() - thresh).max(0) as f32)
        .sum()
}
