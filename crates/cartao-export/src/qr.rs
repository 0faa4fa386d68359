// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Share URL and QR code generation.
//
// The payload is always the single share URL, encoded at error-correction
// level M without chunking or compression.

use std::io::Cursor;

use cartao_core::error::{CartaoError, Result};
use cartao_core::config::MAX_QR_MARGIN_MODULES;
use cartao_core::{QrStyle, Uid};
use image::{DynamicImage, ImageFormat, Luma, Rgba, RgbaImage};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use tracing::{debug, instrument};

/// Error-correction level used for every card QR code.
pub const QR_EC_LEVEL: EcLevel = EcLevel::M;

/// Derives the share URL for a uid and encodes it as a QR symbol.
#[derive(Debug, Clone)]
pub struct QrPayloadBuilder {
    origin: String,
}

impl QrPayloadBuilder {
    /// `origin` is the deployment's external base URL, e.g.
    /// `https://cards.example.com`. A trailing `/` is ignored.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_owned(),
        }
    }

    /// The canonical `<origin>/card/<uid>` address.
    pub fn share_url(&self, uid: &Uid) -> String {
        format!("{}/card/{}", self.origin, uid)
    }

    /// Encode the share URL for `uid`.
    #[instrument(skip(self), fields(uid = %uid))]
    pub fn build(&self, uid: &Uid) -> Result<QrPayload> {
        let url = self.share_url(uid);
        let code = QrCode::with_error_correction_level(url.as_bytes(), QR_EC_LEVEL)
            .map_err(|e| CartaoError::QrEncode(e.to_string()))?;
        debug!(modules = code.width(), "QR symbol encoded");
        Ok(QrPayload { url, code })
    }
}

/// An encoded share URL, renderable as raster or vector.
pub struct QrPayload {
    url: String,
    code: QrCode,
}

impl QrPayload {
    /// The exact string carried by the symbol.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The underlying symbol.
    pub fn code(&self) -> &QrCode {
        &self.code
    }

    /// Rasterize with the given style. The image is at least
    /// `style.size_px` wide, including `style.margin_modules` of quiet zone.
    pub fn to_image(&self, style: &QrStyle) -> Result<RgbaImage> {
        let dark = parse_colour(&style.dark)?;
        let light = parse_colour(&style.light)?;

        let too_wide = || CartaoError::QrEncode(format!("margin of {} modules is too wide", style.margin_modules));
        if style.margin_modules > MAX_QR_MARGIN_MODULES {
            return Err(too_wide());
        }
        let modules = self.code.width() as u32 + 2 * style.margin_modules;
        let module_px = style.size_px.div_ceil(modules).max(1);

        let symbol = self
            .code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(module_px, module_px)
            .build();

        let offset = style.margin_modules.checked_mul(module_px).ok_or_else(too_wide)?;
        let edge = offset
            .checked_mul(2)
            .and_then(|m| m.checked_add(symbol.width()))
            .ok_or_else(too_wide)?;
        let mut out = RgbaImage::from_pixel(edge, edge, light);
        for (x, y, px) in symbol.enumerate_pixels() {
            if px.0[0] < 128 {
                out.put_pixel(x + offset, y + offset, dark);
            }
        }
        debug!(edge, module_px, "QR raster rendered");
        Ok(out)
    }

    /// PNG bytes of [`QrPayload::to_image`].
    pub fn to_png(&self, style: &QrStyle) -> Result<Vec<u8>> {
        let image = self.to_image(style)?;
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| CartaoError::ImageError(format!("failed to encode QR PNG: {e}")))?;
        Ok(buf)
    }

    /// SVG document with the given style. The vector renderer only knows a
    /// fixed quiet zone, so any non-zero margin turns it on.
    pub fn to_svg(&self, style: &QrStyle) -> String {
        self.code
            .render::<svg::Color<'_>>()
            .min_dimensions(style.size_px, style.size_px)
            .quiet_zone(style.margin_modules > 0)
            .dark_color(svg::Color(&style.dark))
            .light_color(svg::Color(&style.light))
            .build()
    }
}

/// Parse `#rrggbb` or `transparent`.
fn parse_colour(value: &str) -> Result<Rgba<u8>> {
    if value.eq_ignore_ascii_case("transparent") {
        return Ok(Rgba([0, 0, 0, 0]));
    }
    let hex = value
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.is_ascii())
        .ok_or_else(|| CartaoError::QrEncode(format!("invalid colour {value:?}")))?;
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| CartaoError::QrEncode(format!("invalid colour {value:?}")))
    };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}
