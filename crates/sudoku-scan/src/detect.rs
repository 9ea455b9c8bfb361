//! End-to-end helpers from `image::GrayImage` and raw grayscale buffers.

use crate::{ScanError, ScanOutcome, ScanParams, ScanPipeline};
use sudoku_scan_core::GrayImageView;

/// Convert an `image::GrayImage` into the lightweight core view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Build an `image::GrayImage` from a raw grayscale buffer with explicit
/// dimension validation.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, ScanError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(ScanError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(ScanError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(ScanError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(ScanError::InvalidGrayDimensions { width, height })
}

/// Run the pipeline on a decoded grayscale image.
pub fn scan_gray_image(
    img: &::image::GrayImage,
    params: ScanParams,
) -> Result<ScanOutcome, ScanError> {
    ScanPipeline::new(params).scan(&gray_view(img))
}

/// Run the pipeline on a raw grayscale buffer.
pub fn scan_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: ScanParams,
) -> Result<ScanOutcome, ScanError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    scan_gray_image(&img, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_is_validated() {
        let err = gray_image_from_slice(10, 10, &[0u8; 99]).unwrap_err();
        assert!(matches!(
            err,
            ScanError::InvalidGrayBuffer {
                expected: 100,
                got: 99
            }
        ));
    }

    #[test]
    fn valid_buffer_round_trips() {
        let img = gray_image_from_slice(4, 3, &[7u8; 12]).expect("valid buffer");
        let view = gray_view(&img);
        assert_eq!((view.width, view.height), (4, 3));
        assert_eq!(view.data[5], 7);
    }
}
