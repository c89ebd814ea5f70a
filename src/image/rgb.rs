//! Owned 8-bit RGB image, the unit of work for overlap estimation and
//! compositing.
//!
//! Pixels are stored as `[r, g, b]` triples in row-major order with
//! `stride == w`. There is no alpha channel: decoders drop it before the
//! data reaches this type, so every comparison sees colour only.

use super::u8::GrayImageU8;
use super::ImageView;

/// One RGB pixel, channels in `[r, g, b]` order.
pub type Rgb = [u8; 3];

/// Pack a pixel as `0xRRGGBB`.
#[inline]
pub fn pack_rgb(px: Rgb) -> u32 {
    ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32
}

/// Unpack `0xRRGGBB`; bits above the low 24 are ignored.
#[inline]
pub fn unpack_rgb(c: u32) -> Rgb {
    [((c >> 16) & 0xFF) as u8, ((c >> 8) & 0xFF) as u8, (c & 0xFF) as u8]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRgb {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Pixels between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<Rgb>,
}

impl ImageRgb {
    /// Black image of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, [0, 0, 0])
    }

    pub fn filled(w: usize, h: usize, px: Rgb) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![px; w * h],
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    /// Wrap row-major pixels. Returns `None` when the length does not match.
    pub fn from_raw(w: usize, h: usize, data: Vec<Rgb>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        let i = self.idx(x, y);
        self.data[i] = px;
    }

    /// Luma conversion with integer Rec.601 weights (77, 150, 29) / 256.
    pub fn to_gray(&self) -> GrayImageU8 {
        let data = self
            .data
            .iter()
            .map(|&[r, g, b]| {
                ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8).min(255) as u8
            })
            .collect();
        GrayImageU8::from_raw(self.w, self.h, data)
            .unwrap_or_else(|| GrayImageU8::new(self.w, self.h))
    }

    /// Mean channel value: the sum of R, G and B over all pixels divided by
    /// `w · h · 3`. Empty images report 0.
    pub fn mean_brightness(&self) -> f64 {
        let count = self.w * self.h * 3;
        if count == 0 {
            return 0.0;
        }
        let sum: u64 = self
            .rows()
            .flat_map(|row| row.iter())
            .map(|px| px[0] as u64 + px[1] as u64 + px[2] as u64)
            .sum();
        sum as f64 / count as f64
    }
}

impl crate::image::traits::ImageView for ImageRgb {
    type Pixel = Rgb;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl crate::image::traits::ImageViewMut for ImageRgb {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
