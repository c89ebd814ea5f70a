use pano_stitch::image::{unpack_rgb, ImageRgb};

/// Horizontal linear ramp from `start` to `end` (`0xRRGGBB`), constant along y.
/// Channel `c` at column `x` is `trunc(start_c · (1 − x/w) + end_c · x/w)`.
pub fn horizontal_gradient(w: usize, h: usize, start: u32, end: u32) -> ImageRgb {
    let (s, e) = (unpack_rgb(start), unpack_rgb(end));
    ImageRgb::from_fn(w, h, |x, _| {
        let ratio = x as f32 / w as f32;
        std::array::from_fn(|c| (s[c] as f32 * (1.0 - ratio) + e[c] as f32 * ratio) as u8)
    })
}

/// Channel-wise scale, truncated.
pub fn darkened(image: &ImageRgb, factor: f32) -> ImageRgb {
    ImageRgb::from_fn(image.w, image.h, |x, y| {
        image.get(x, y).map(|c| (c as f32 * factor) as u8)
    })
}

/// Deterministic clutter of overlapping coloured rectangles on a grey
/// background. Rich in corners, free of repetition.
pub fn textured_scene(w: usize, h: usize, seed: u64) -> ImageRgb {
    assert!(w > 0 && h > 0, "scene dimensions must be positive");
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as usize
    };

    let mut img = ImageRgb::filled(w, h, [128, 128, 128]);
    for _ in 0..(w * h / 150) {
        let rw = 4 + next() % 20;
        let rh = 4 + next() % 20;
        let x0 = next() % w;
        let y0 = next() % h;
        let color = [(next() % 256) as u8, (next() % 256) as u8, (next() % 256) as u8];
        for y in y0..(y0 + rh).min(h) {
            for x in x0..(x0 + rw).min(w) {
                img.set(x, y, color);
            }
        }
    }
    img
}

/// Columns `x0 .. x0 + w` of `image`.
pub fn crop_columns(image: &ImageRgb, x0: usize, w: usize) -> ImageRgb {
    assert!(x0 + w <= image.w, "crop exceeds image width");
    ImageRgb::from_fn(w, image.h, |x, y| image.get(x0 + x, y))
}
