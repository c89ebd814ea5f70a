//! Separable smoothing used ahead of descriptor sampling.
//!
//! Borders replicate the nearest edge sample. Output is `ImageF32` in the
//! same intensity units as the 8-bit input (`0..=255`).

use crate::image::{ImageF32, ImageU8, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl Default for StaticSeparableFilter {
    fn default() -> Self {
        BINOMIAL_9TAP
    }
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 9-tap binomial `[1, 8, 28, 56, 70, 56, 28, 8, 1] / 256`
/// (a Gaussian with sigma = 1.41).
pub const BINOMIAL_9TAP: StaticSeparableFilter = StaticSeparableFilter::new(&[
    0.003_906_25,
    0.031_25,
    0.109_375,
    0.218_75,
    0.273_437_5,
    0.218_75,
    0.109_375,
    0.031_25,
    0.003_906_25,
]);

/// Horizontal then vertical pass of `filter` over `src`.
pub fn apply(filter: &dyn SeparableFilter, src: ImageU8<'_>) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let taps = filter.taps();
    let radius = (taps.len() / 2) as isize;
    let mut horiz = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return horiz;
    }
    let max_x = w as isize - 1;
    for y in 0..h {
        let src_row = src.row(y);
        let dst_row = horiz.row_mut(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = (x as isize + k as isize - radius).clamp(0, max_x) as usize;
                acc += tap * src_row[sx] as f32;
            }
            *dst = acc;
        }
    }

    let max_y = h as isize - 1;
    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = (y as isize + k as isize - radius).clamp(0, max_y) as usize;
                acc += tap * horiz.get(x, sy);
            }
            out.set(x, y, acc);
        }
    }
    out
}
