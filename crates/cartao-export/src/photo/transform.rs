// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Avatar display transform: stored zoom/offset numbers to a 2D transform.
//
// The transform translates by (dx, dy) and then scales by z, both about the
// frame centre. A point p inside a frame with centre c lands on
//
//     p' = c + d + z * (p - c)
//
// so the offset stays in screen pixels whatever the zoom.

use cartao_core::Profile;
use cartao_core::profile::DEFAULT_PHOTO_ZOOM;
use imageproc::geometric_transformations::Projection;

/// CSS `transform-origin` that must accompany [`PhotoTransform::to_css`].
pub const TRANSFORM_ORIGIN: &str = "center";

/// Range the editor's zoom slider allows.
pub const ZOOM_RANGE: (f64, f64) = (1.0, 2.5);

/// Range the editor's offset sliders allow, in pixels.
pub const OFFSET_RANGE: (f64, f64) = (-40.0, 40.0);

/// Zoom and pixel offsets for the circular avatar frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoTransform {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_PHOTO_ZOOM,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl PhotoTransform {
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            zoom,
            offset_x,
            offset_y,
        }
    }

    /// Values exactly as stored on the profile, out-of-range ones included.
    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(profile.photo_zoom, profile.photo_offset_x, profile.photo_offset_y)
    }

    /// Whether this transform leaves the frame unchanged.
    pub fn is_identity(&self) -> bool {
        self.zoom == 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }

    /// CSS transform list. Translate is listed first so it is applied in
    /// unscaled pixels.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset_x, self.offset_y, self.zoom
        )
    }

    /// Where point `(x, y)` of a square frame of side `frame_px` ends up.
    pub fn map_point(&self, frame_px: f64, (x, y): (f64, f64)) -> (f64, f64) {
        let c = frame_px / 2.0;
        (
            c + self.offset_x + self.zoom * (x - c),
            c + self.offset_y + self.zoom * (y - c),
        )
    }

    /// The same forward mapping as [`PhotoTransform::map_point`], for use
    /// with `imageproc` warps.
    pub fn to_projection(&self, frame_px: u32) -> Projection {
        let c = frame_px as f32 / 2.0;
        let z = self.zoom as f32;
        Projection::translate(c + self.offset_x as f32, c + self.offset_y as f32)
            * Projection::scale(z, z)
            * Projection::translate(-c, -c)
    }

    /// Limit to the editor's slider ranges. Rendering does not clamp on its
    /// own; callers opt in.
    pub fn clamped(&self) -> Self {
        Self {
            zoom: self.zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1),
            offset_x: self.offset_x.clamp(OFFSET_RANGE.0, OFFSET_RANGE.1),
            offset_y: self.offset_y.clamp(OFFSET_RANGE.0, OFFSET_RANGE.1),
        }
    }
}
