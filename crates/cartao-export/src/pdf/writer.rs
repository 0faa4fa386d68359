// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card PDF writer using `printpdf` 0.8.
//
// The page is sized to the measured card and the snapshot is placed at the
// origin at 96 dpi, so one snapshot pixel is one CSS pixel on paper.

use std::path::Path;

use cartao_core::error::{CartaoError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::print::layout::{PX_PER_INCH, PageGeometry};

/// Writes a rendered card snapshot to a single-page PDF.
pub struct CardPdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl Default for CardPdfWriter {
    fn default() -> Self {
        Self::new("Digital card")
    }
}

impl CardPdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    /// Create a PDF whose only page is `geometry`, with the snapshot image
    /// (PNG, JPEG...) drawn at the page origin without margin or scaling.
    #[instrument(skip(self, snapshot), fields(bytes_len = snapshot.len(), %geometry))]
    pub fn create_from_snapshot(&self, snapshot: &[u8], geometry: PageGeometry) -> Result<Vec<u8>> {
        if geometry.width_mm <= 0.0 || geometry.height_mm <= 0.0 {
            return Err(CartaoError::PdfError(format!(
                "page geometry must be positive, got {geometry}"
            )));
        }

        let decoded = ::image::load_from_memory(snapshot).map_err(|err| {
            CartaoError::ImageError(format!("failed to decode card snapshot: {err}"))
        })?;
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);

        let raw = RawImage {
            pixels: RawImageData::U8(decoded.to_rgb8().into_raw()),
            width,
            height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(&self.title);
        let xobject_id = doc.add_image(&raw);

        // PDF origin is bottom-left; anchor the snapshot's top edge to the
        // page's top edge so any rounding slack falls off the bottom.
        let page_h_pt = Mm(geometry.height_mm as f32).into_pt().0;
        let img_h_pt = height as f32 / PX_PER_INCH as f32 * 72.0;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(page_h_pt - img_h_pt)),
                scale_x: None,
                scale_y: None,
                dpi: Some(PX_PER_INCH as f32),
                rotate: None,
            },
        }];

        let page = PdfPage::new(
            Mm(geometry.width_mm as f32),
            Mm(geometry.height_mm as f32),
            ops,
        );
        doc.with_pages(vec![page]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings");
        }
        debug!(width, height, bytes = output.len(), "Card PDF written");
        Ok(output)
    }

    /// [`CardPdfWriter::create_from_snapshot`] straight to a file.
    pub fn write_snapshot_to_file(
        &self,
        snapshot: &[u8],
        geometry: PageGeometry,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.create_from_snapshot(snapshot, geometry)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote card PDF to {}", path.as_ref().display());
        Ok(())
    }
}
