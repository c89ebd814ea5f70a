mod common;

use common::init_logger;
use common::synthetic_image::{crop_columns, darkened, horizontal_gradient, textured_scene};
use pano_stitch::diagnostics::Strategy;
use pano_stitch::image::{pack_rgb, ImageRgb};
use pano_stitch::overlap::{OverlapEstimator, PixelCorrelationEstimator};
use pano_stitch::stitcher::{concatenate_horizontal, BlendOptions};
use pano_stitch::{PanoramaAssembler, StitchError};
use std::borrow::Cow;

struct FixedOverlap(usize);

impl OverlapEstimator for FixedOverlap {
    fn find_overlap(&self, _: &ImageRgb, _: &ImageRgb) -> usize {
        self.0
    }
}

#[test]
fn single_image_returns_the_same_instance() {
    init_logger();
    let images = vec![ImageRgb::new(100, 100)];
    let result = PanoramaAssembler::default().stitch(&images).unwrap();
    assert!(matches!(result, Cow::Borrowed(_)));
    assert!(
        std::ptr::eq(result.as_ref(), &images[0]),
        "stitching a single image should return the same instance"
    );
}

#[test]
fn empty_list_is_invalid_input() {
    let images: Vec<ImageRgb> = Vec::new();
    let err = PanoramaAssembler::default().stitch(&images).unwrap_err();
    assert!(matches!(err, StitchError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn dissimilar_pair_is_concatenated() {
    init_logger();
    let mut image1 = ImageRgb::new(2, 3);
    image1.set(0, 0, [255, 0, 0]);
    let mut image2 = ImageRgb::new(2, 3);
    image2.set(0, 0, [0, 255, 0]);
    let images = vec![image1, image2];

    let (result, report) = PanoramaAssembler::new(PixelCorrelationEstimator::default())
        .stitch_with_report(&images)
        .unwrap();
    assert_eq!(report.steps[0].estimate.strategy, Strategy::PixelCorrelation);
    assert_eq!(report.steps[0].overlap, 0);
    assert_eq!(result.w, 4, "width should be the sum of both widths");
    assert_eq!(result.h, 3, "height should be the max of both heights");
    assert_eq!(result.get(0, 0), images[0].get(0, 0));
    assert_eq!(result.get(2, 0), images[1].get(0, 0));

    let via_feature = PanoramaAssembler::default().stitch(&images).unwrap();
    assert_eq!(
        via_feature.as_ref(),
        result.as_ref(),
        "feature path falls back to the same answer"
    );
}

#[test]
fn gradient_pair_overlaps_by_half_width() {
    init_logger();
    let left = horizontal_gradient(100, 100, 0xFF0000, 0x00FF00);
    let right = horizontal_gradient(100, 100, 0x00FF00, 0x0000FF);
    let images = vec![left, right];

    let result = PanoramaAssembler::default().stitch(&images).unwrap();
    assert!(
        result.w > 140 && result.w < 160,
        "width should reflect partial overlap, got {}",
        result.w
    );
}

#[test]
fn different_heights_leave_missing_rows_black() {
    init_logger();
    let images = vec![
        ImageRgb::filled(2, 2, [255, 0, 0]),
        ImageRgb::filled(2, 3, [0, 255, 0]),
    ];
    let result = PanoramaAssembler::default().stitch(&images).unwrap();

    assert_eq!((result.w, result.h), (4, 3));
    assert_eq!(pack_rgb(result.get(2, 2)), 0x00FF00, "extra row of the second image");
    assert_eq!(pack_rgb(result.get(0, 2)), 0, "below the first image stays black");
}

#[test]
fn darker_second_image_overlaps_by_half_width() {
    init_logger();
    let base = horizontal_gradient(200, 200, 0xFFFFFF, 0x000000);
    let dark = darkened(&base, 0.7);
    let images = vec![base, dark];

    let (result, report) = PanoramaAssembler::default()
        .stitch_with_report(&images)
        .unwrap();
    assert!(result.w > 250 && result.w < 350, "got width {}", result.w);
    assert_eq!(report.steps[0].overlap, 100);
}

#[test]
fn single_row_seam_is_blended_linearly() {
    init_logger();
    const W: usize = 20;
    let (w1, w2) = (30, 30);
    let images = vec![
        ImageRgb::filled(w1, 1, [255, 0, 0]),
        ImageRgb::filled(w2, 1, [0, 0, 255]),
    ];
    let result = PanoramaAssembler::default().stitch(&images).unwrap();
    assert_eq!(result.w, w1 + w2, "distinct images should not overlap");

    let x_off = w1;
    assert_eq!(result.get(x_off, 0), [255, 0, 0], "blend start is the left image");
    assert_eq!(result.get(x_off + W - 1, 0), [0, 0, 255], "blend end is the right image");

    let [r, g, b] = result.get(x_off + W / 2, 0);
    assert!(
        (r as i32 - 127).abs() <= 10 && g == 0 && (b as i32 - 127).abs() <= 10,
        "mid-blend should be purple-ish, got ({r}, {g}, {b})"
    );
    assert_eq!(result.get(w1 + w2 - 1, 0), [0, 0, 255]);
}

#[test]
fn configured_blend_width_shortens_the_ramp() {
    let images = vec![
        ImageRgb::filled(10, 1, [200, 0, 0]),
        ImageRgb::filled(10, 1, [0, 0, 200]),
    ];
    let result = PanoramaAssembler::new(FixedOverlap(0))
        .with_blend(BlendOptions { width: 3 })
        .stitch(&images)
        .unwrap();
    assert_eq!(result.get(11, 0), [100, 0, 100]);
    assert_eq!(result.get(12, 0), [0, 0, 200]);
}

fn assert_prefix_unchanged(before: &ImageRgb, after: &ImageRgb, columns: usize) {
    for y in 0..before.h {
        for x in 0..columns {
            assert_eq!(
                before.get(x, y),
                after.get(x, y),
                "pixel ({x}, {y}) changed by the next fold step"
            );
        }
    }
}

#[test]
fn third_fold_step_keeps_pixels_left_of_its_overlap() {
    init_logger();
    let scene = textured_scene(300, 40, 7);
    let images = vec![
        crop_columns(&scene, 0, 120),
        crop_columns(&scene, 90, 120),
        crop_columns(&scene, 180, 120),
    ];
    let assembler = PanoramaAssembler::new(FixedOverlap(30));
    let two = assembler.stitch(&images[..2]).unwrap();
    let three = assembler.stitch(&images).unwrap();
    assert_eq!(three.w, two.w + 120 - 30);
    assert_prefix_unchanged(&two, &three, two.w - 30);
}

#[test]
fn third_fold_step_keeps_single_row_pixels_left_of_the_blend_band() {
    let images = vec![
        horizontal_gradient(40, 1, 0xFF0000, 0x00FF00),
        horizontal_gradient(40, 1, 0x00FF00, 0x0000FF),
        ImageRgb::filled(40, 1, [10, 20, 30]),
    ];
    let assembler = PanoramaAssembler::new(PixelCorrelationEstimator::default());
    let (two, _) = assembler.stitch_with_report(&images[..2]).unwrap();
    let (three, report) = assembler.stitch_with_report(&images).unwrap();
    let last = report.steps.last().unwrap();
    assert!(last.blended);
    assert_prefix_unchanged(&two, &three, two.w - last.overlap);
}

#[test]
fn concatenation_mode_ignores_overlap() {
    let scene = textured_scene(120, 30, 3);
    let images = vec![crop_columns(&scene, 0, 80), crop_columns(&scene, 40, 80)];
    let out = concatenate_horizontal(&images).unwrap();
    assert_eq!((out.w, out.h), (160, 30));
    assert_eq!(out.get(80, 5), scene.get(40, 5));
}
