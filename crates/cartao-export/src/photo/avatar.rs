// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster avatar rendering for print and PDF output.

use cartao_core::error::{CartaoError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, warp};
use tracing::{debug, instrument};

use super::transform::PhotoTransform;

/// Decode an uploaded photo (JPEG, PNG, WebP...).
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn load_photo(data: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(data)
        .map_err(|err| CartaoError::ImageError(format!("failed to decode photo: {err}")))
}

/// Render the circular avatar of side `frame_px`.
///
/// 1. Cover-fit the photo to the square frame (centre crop).
/// 2. Apply `transform` about the frame centre.
/// 3. Mask everything outside the inscribed circle to transparent.
///
/// Areas uncovered by the transform are transparent too.
#[instrument(skip(photo), fields(src_w = photo.width(), src_h = photo.height()))]
pub fn render_avatar(photo: &DynamicImage, frame_px: u32, transform: &PhotoTransform) -> RgbaImage {
    let frame_px = frame_px.max(1);
    let fitted = photo
        .resize_to_fill(frame_px, frame_px, FilterType::Triangle)
        .to_rgba8();

    let clear = Rgba([0u8, 0, 0, 0]);
    let mut out = if transform.is_identity() {
        fitted
    } else {
        warp(
            &fitted,
            &transform.to_projection(frame_px),
            Interpolation::Bilinear,
            clear,
        )
    };

    let r = frame_px as f32 / 2.0;
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        if dx * dx + dy * dy > r * r {
            *px = clear;
        }
    }

    debug!(frame_px, css = %transform.to_css(), "Avatar rendered");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// 100x100, left half red, right half blue.
    fn split_photo() -> DynamicImage {
        let img = RgbaImage::from_fn(100, 100, |x, _| if x < 50 { RED } else { BLUE });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn corners_are_masked() {
        let out = render_avatar(&split_photo(), 100, &PhotoTransform::default());
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(99, 99)[3], 0);
        assert_eq!(*out.get_pixel(20, 50), RED);
        assert_eq!(*out.get_pixel(80, 50), BLUE);
    }

    #[test]
    fn offset_moves_content_in_screen_pixels() {
        let t = PhotoTransform::new(1.0, 20.0, 0.0);
        let out = render_avatar(&split_photo(), 100, &t);
        // (60, 50) now shows source (40, 50).
        assert_eq!(*out.get_pixel(60, 50), RED);
        assert_eq!(*out.get_pixel(80, 50), BLUE);
    }

    #[test]
    fn zoom_magnifies_about_centre() {
        let t = PhotoTransform::new(2.0, 0.0, 0.0);
        let out = render_avatar(&split_photo(), 100, &t);
        assert_eq!(*out.get_pixel(45, 50), RED);
        assert_eq!(*out.get_pixel(60, 50), BLUE);
    }

    #[test]
    fn non_square_photo_is_cover_fitted() {
        let wide = DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 100, BLUE));
        let out = render_avatar(&wide, 64, &PhotoTransform::default());
        assert_eq!(out.dimensions(), (64, 64));
        assert_eq!(*out.get_pixel(32, 32), BLUE);
    }

    #[test]
    fn undecodable_bytes_are_an_image_error() {
        assert!(matches!(
            load_photo(b"not an image"),
            Err(CartaoError::ImageError(_))
        ));
    }
}
