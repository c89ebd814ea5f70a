//! Compositing of one left/right pair onto a new canvas.
//!
//! The canvas is `(w1 + w2 - overlap) × max(h1, h2)`, black where neither
//! image reaches. The left image is copied first. Multi-row pairs then get the
//! right image drawn over it at `x = w1 - overlap`. Single-row pairs get a
//! linear seam ramp instead: the first `width` columns of the right image are
//! mixed with the left image's pixel at the same canvas column (clamped to its
//! last column), with the right weight rising from 0 to 1.

use crate::image::{ImageRgb, ImageView, ImageViewMut, Rgb};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BlendOptions {
    /// Columns of the seam ramp for single-row pairs.
    pub width: usize,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self { width: 20 }
    }
}

/// Both operands are exactly one row high.
#[inline]
pub fn is_single_row(left: &ImageRgb, right: &ImageRgb) -> bool {
    left.h == 1 && right.h == 1
}

pub fn composite_pair(
    left: &ImageRgb,
    right: &ImageRgb,
    overlap: usize,
    blend: &BlendOptions,
) -> ImageRgb {
    let overlap = overlap.min(left.w.min(right.w));
    let x_off = left.w - overlap;
    let mut canvas = ImageRgb::new(left.w + right.w - overlap, left.h.max(right.h));
    copy_into(&mut canvas, left, 0);
    if is_single_row(left, right) {
        blend_row(&mut canvas, left, right, x_off, blend.width);
    } else {
        copy_into(&mut canvas, right, x_off);
    }
    canvas
}

fn copy_into(canvas: &mut ImageRgb, src: &ImageRgb, x_off: usize) {
    for y in 0..src.h {
        canvas.row_mut(y)[x_off..x_off + src.w].copy_from_slice(src.row(y));
    }
}

fn blend_row(canvas: &mut ImageRgb, left: &ImageRgb, right: &ImageRgb, x_off: usize, width: usize) {
    if left.w == 0 {
        copy_into(canvas, right, x_off);
        return;
    }
    let l = left.row(0);
    let r = right.row(0);
    let out = canvas.row_mut(0);
    let band = width.min(right.w);
    for (x, &px) in r.iter().enumerate() {
        out[x_off + x] = if x < band {
            let alpha = if width <= 1 {
                1.0
            } else {
                x as f32 / (width - 1) as f32
            };
            mix(l[(x_off + x).min(left.w - 1)], px, alpha)
        } else {
            px
        };
    }
}

/// `(1 - alpha) * a + alpha * b`, truncated per channel.
#[inline]
fn mix(a: Rgb, b: Rgb, alpha: f32) -> Rgb {
    std::array::from_fn(|c| ((1.0 - alpha) * a[c] as f32 + alpha * b[c] as f32) as u8)
}
