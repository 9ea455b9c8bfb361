//! Core buffer and geometry types for sudoku board scanning.
//!
//! This crate is intentionally small: grayscale buffers, resampling, and
//! projective mapping. It does *not* know about boards, glyphs, or any
//! concrete pipeline stage.

mod homography;
mod image;
mod logger;
mod resize;

pub use homography::{homography_from_4pt, warp_perspective_gray, Homography};
pub use image::{copy_rect, sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};
pub use resize::{fit_longest_side, resize_lanczos};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
