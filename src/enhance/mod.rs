//! Intensity normalisation applied before feature detection.
//!
//! `equalize_local` splits the image into square tiles, builds one
//! histogram-equalisation lookup table per tile and blends the four nearest
//! tables bilinearly for every pixel. This removes exposure differences
//! between neighbouring shots without the blocking artefacts of per-tile
//! remapping.

pub mod filters;

use crate::image::{GrayImageU8, ImageU8, ImageView};

/// Tile edge length used by the overlap estimator.
pub const DEFAULT_TILE_SIZE: usize = 20;

/// Locally equalise `gray` using `tile_size × tile_size` tiles.
///
/// A zero tile size or an empty image returns an unmodified copy.
pub fn equalize_local(gray: ImageU8<'_>, tile_size: usize) -> GrayImageU8 {
    let (w, h) = (gray.w, gray.h);
    let mut out = GrayImageU8::new(w, h);
    if w == 0 || h == 0 || tile_size == 0 {
        for y in 0..h {
            for (x, &v) in gray.row(y).iter().enumerate() {
                out.set(x, y, v);
            }
        }
        return out;
    }

    let cols = w.div_ceil(tile_size);
    let rows = h.div_ceil(tile_size);
    let mut luts = vec![[0u8; 256]; cols * rows];
    for ty in 0..rows {
        for tx in 0..cols {
            let x0 = tx * tile_size;
            let y0 = ty * tile_size;
            let x1 = (x0 + tile_size).min(w);
            let y1 = (y0 + tile_size).min(h);
            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for &v in &gray.row(y)[x0..x1] {
                    hist[v as usize] += 1;
                }
            }
            luts[ty * cols + tx] = build_lut(&hist, (x1 - x0) * (y1 - y0));
        }
    }

    let ts = tile_size as f32;
    for y in 0..h {
        let fy = (y as f32 / ts - 0.5).max(0.0);
        let ty0 = (fy.floor() as usize).min(rows - 1);
        let ty1 = (ty0 + 1).min(rows - 1);
        let ay = if ty0 == ty1 { 0.0 } else { (fy - ty0 as f32).clamp(0.0, 1.0) };
        let src = gray.row(y);
        for (x, &v) in src.iter().enumerate() {
            let fx = (x as f32 / ts - 0.5).max(0.0);
            let tx0 = (fx.floor() as usize).min(cols - 1);
            let tx1 = (tx0 + 1).min(cols - 1);
            let ax = if tx0 == tx1 { 0.0 } else { (fx - tx0 as f32).clamp(0.0, 1.0) };

            let v = v as usize;
            let v00 = luts[ty0 * cols + tx0][v] as f32;
            let v10 = luts[ty0 * cols + tx1][v] as f32;
            let v01 = luts[ty1 * cols + tx0][v] as f32;
            let v11 = luts[ty1 * cols + tx1][v] as f32;
            let val = v00 * (1.0 - ax) * (1.0 - ay)
                + v10 * ax * (1.0 - ay)
                + v01 * (1.0 - ax) * ay
                + v11 * ax * ay;
            out.set(x, y, val.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

/// CDF lookup table. A tile holding a single grey level maps to identity.
fn build_lut(hist: &[u32; 256], total: usize) -> [u8; 256] {
    let mut lut = [0u8; 256];
    let mut cdf = [0u32; 256];
    let mut running = 0u32;
    for (c, &count) in cdf.iter_mut().zip(hist.iter()) {
        running += count;
        *c = running;
    }
    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    let denom = total as f32 - cdf_min as f32;
    if denom <= 0.0 {
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = i as u8;
        }
        return lut;
    }
    for (slot, &c) in lut.iter_mut().zip(cdf.iter()) {
        let val = (c as f32 - cdf_min as f32) / denom * 255.0;
        *slot = val.round().clamp(0.0, 255.0) as u8;
    }
    lut
}
