use crate::error::StitchError;
use crate::image::{ImageRgb, ImageView, ImageViewMut};

/// Place the images side by side without any overlap handling.
///
/// The result is `Σw × max(h)`; rows beyond an image's height stay black.
pub fn concatenate_horizontal(images: &[ImageRgb]) -> Result<ImageRgb, StitchError> {
    if images.is_empty() {
        return Err(StitchError::InvalidInput("no images to concatenate".to_string()));
    }
    let width = images.iter().map(|img| img.w).sum();
    let height = images.iter().map(|img| img.h).max().unwrap_or(0);
    let mut canvas = ImageRgb::new(width, height);
    let mut x_off = 0;
    for img in images {
        for y in 0..img.h {
            canvas.row_mut(y)[x_off..x_off + img.w].copy_from_slice(img.row(y));
        }
        x_off += img.w;
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_add_up_and_heights_take_the_max() {
        let images = vec![
            ImageRgb::filled(2, 2, [255, 0, 0]),
            ImageRgb::filled(3, 4, [0, 255, 0]),
            ImageRgb::filled(1, 1, [0, 0, 255]),
        ];
        let out = concatenate_horizontal(&images).unwrap();
        assert_eq!((out.w, out.h), (6, 4));
        assert_eq!(out.get(1, 1), [255, 0, 0]);
        assert_eq!(out.get(1, 3), [0, 0, 0]);
        assert_eq!(out.get(4, 3), [0, 255, 0]);
        assert_eq!(out.get(5, 0), [0, 0, 255]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            concatenate_horizontal(&[]),
            Err(StitchError::InvalidInput(_))
        ));
    }
}
