// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print page geometry matching the rendered card's pixel box.
//
// Conversion assumes 96 px per inch: mm = px * 25.4 / 96, each dimension
// rounded to two decimals. The page has zero margin.

use std::fmt;
use std::io::Cursor;

use cartao_bridge::CardMeasure;
use cartao_core::error::{CartaoError, Result};
use image::ImageReader;
use tracing::{debug, trace};

/// CSS reference pixel density.
pub const PX_PER_INCH: f64 = 96.0;

const MM_PER_INCH: f64 = 25.4;

/// Print rules applied whether or not a page size is known.
const PRINT_MEDIA_CSS: &str = "@media print {
  * { -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; }
  .no-print { display: none !important; }
  .print-card { box-shadow: none !important; }
  .print-wrap { margin: 0 !important; padding: 0 !important; width: auto !important; }
}";

/// Pixels to millimetres, rounded to two decimals.
pub fn px_to_mm(px: f64) -> f64 {
    (px * MM_PER_INCH / PX_PER_INCH * 100.0).round() / 100.0
}

/// A page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    /// Geometry for a measured box of `width_px` x `height_px`.
    pub fn from_px(width_px: f64, height_px: f64) -> Self {
        Self {
            width_mm: px_to_mm(width_px),
            height_mm: px_to_mm(height_px),
        }
    }
}

/// Renders as a CSS `size` value with two decimals, e.g. `101.60mm 158.75mm`.
impl fmt::Display for PageGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}mm {:.2}mm", self.width_mm, self.height_mm)
    }
}

/// Tracks the card's page geometry across content changes.
///
/// Content changes only mark the geometry stale; the actual measurement is
/// taken on the next paint via [`PrintLayoutCalculator::on_paint`], once
/// layout has settled. A card that cannot be measured keeps the previous
/// geometry.
#[derive(Debug, Clone)]
pub struct PrintLayoutCalculator {
    last: Option<PageGeometry>,
    stale: bool,
}

impl Default for PrintLayoutCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintLayoutCalculator {
    pub fn new() -> Self {
        Self {
            last: None,
            stale: true,
        }
    }

    /// Rendered content changed (profile edit, image or font load).
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Whether a re-measure is waiting for the next paint.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Paint opportunity: re-measure if stale and return the current geometry.
    pub fn on_paint(&mut self, measure: &dyn CardMeasure) -> Option<PageGeometry> {
        if !self.stale {
            return self.last;
        }
        match measure.measure() {
            Some((w, h)) if w > 0.0 && h > 0.0 => {
                let geometry = PageGeometry::from_px(w, h);
                debug!(%geometry, "Print geometry measured");
                self.last = Some(geometry);
                self.stale = false;
            }
            _ => trace!("Card not measurable yet; keeping previous geometry"),
        }
        self.last
    }

    /// Last computed geometry, if any.
    pub fn geometry(&self) -> Option<PageGeometry> {
        self.last
    }

    /// Page rules for the print surface. `size` is omitted until a geometry
    /// has been measured.
    pub fn page_css(&self) -> String {
        let page = match self.last {
            Some(g) => format!("@page {{ size: {g}; margin: 0; }}"),
            None => "@page { margin: 0; }".to_owned(),
        };
        format!("{page}\n{PRINT_MEDIA_CSS}")
    }
}

/// Measures a rendered card snapshot by its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterMeasure {
    pub width: u32,
    pub height: u32,
}

impl RasterMeasure {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Read the dimensions from encoded image bytes without decoding pixels.
    pub fn from_encoded(data: &[u8]) -> Result<Self> {
        let (width, height) = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CartaoError::ImageError(format!("unreadable snapshot: {e}")))?
            .into_dimensions()
            .map_err(|e| CartaoError::ImageError(format!("unreadable snapshot: {e}")))?;
        Ok(Self { width, height })
    }
}

impl CardMeasure for RasterMeasure {
    fn measure(&self) -> Option<(f64, f64)> {
        Some((self.width as f64, self.height as f64))
    }
}
