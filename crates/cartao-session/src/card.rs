// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only card view behind the share URL.

use cartao_bridge::DocumentStore;
use cartao_core::error::{CartaoError, Result};
use cartao_core::{CardLinks, Profile, QrStyle, Uid};
use cartao_export::{
    CardPdfWriter, PageGeometry, PhotoTransform, PrintLayoutCalculator, QrPayloadBuilder,
    RasterMeasure, VCardFile,
};
use tracing::{debug, info, instrument};

/// A stored profile as visitors see it. Needs no session.
#[derive(Debug, Clone)]
pub struct PublicCard {
    pub uid: Uid,
    pub profile: Profile,
    pub links: CardLinks,
    pub photo: PhotoTransform,
    pub share_url: String,
    qr: QrPayloadBuilder,
}

impl PublicCard {
    /// Load the card for `uid`. `Ok(None)` when no profile is stored.
    #[instrument(skip(store), fields(uid = %uid))]
    pub async fn load(store: &dyn DocumentStore, uid: &Uid, origin: &str) -> Result<Option<Self>> {
        let Some(document) = store.load(uid).await? else {
            info!("card not found");
            return Ok(None);
        };
        Ok(Some(Self::from_profile(
            uid.clone(),
            Profile::from_document(&document, None),
            origin,
        )))
    }

    pub fn from_profile(uid: Uid, profile: Profile, origin: &str) -> Self {
        let qr = QrPayloadBuilder::new(origin);
        Self {
            links: CardLinks::from_profile(&profile),
            photo: PhotoTransform::from_profile(&profile),
            share_url: qr.share_url(&uid),
            uid,
            profile,
            qr,
        }
    }

    pub fn vcard(&self) -> VCardFile {
        VCardFile::from_profile(&self.profile)
    }

    /// The card's QR code as SVG.
    pub fn qr_svg(&self, style: &QrStyle) -> Result<String> {
        Ok(self.qr.build(&self.uid)?.to_svg(style))
    }

    /// Print the card: size the page after the rendered snapshot and embed it.
    #[instrument(skip(self, snapshot), fields(uid = %self.uid, bytes_len = snapshot.len()))]
    pub fn pdf_from_snapshot(&self, snapshot: &[u8]) -> Result<(PageGeometry, Vec<u8>)> {
        let mut layout = PrintLayoutCalculator::new();
        let geometry = layout
            .on_paint(&RasterMeasure::from_encoded(snapshot)?)
            .ok_or_else(|| CartaoError::PdfError("card snapshot has no size".into()))?;
        debug!(css = %layout.page_css(), "print layout computed");

        let title = format!("Digital card - {}", self.profile.name);
        let pdf = CardPdfWriter::new(title).create_from_snapshot(snapshot, geometry)?;
        Ok((geometry, pdf))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use cartao_bridge::memory::MemoryDocumentStore;
    use cartao_core::LinkKind;
    use serde_json::json;

    #[tokio::test]
    async fn missing_card_is_none() {
        let store = MemoryDocumentStore::new();
        let card = PublicCard::load(&store, &Uid::new("ghost"), "https://cards.test")
            .await
            .expect("load");
        assert!(card.is_none());
    }

    #[tokio::test]
    async fn stored_card_has_links_and_share_url() {
        let store = MemoryDocumentStore::new().with_document("u1", json!({
            "name": "Ana Silva",
            "phone": "(11) 99999-0000",
            "instagram": "instagram.com/ana",
            "photoZoom": 1.5,
            "photoOffsetX": 10,
        }));
        let card = PublicCard::load(&store, &Uid::new("u1"), "https://cards.test/")
            .await
            .expect("load")
            .expect("found");

        assert_eq!(card.share_url, "https://cards.test/card/u1");
        assert_eq!(card.links.actions[1].kind, LinkKind::WhatsApp);
        assert_eq!(card.links.actions[1].href, "https://wa.me/11999990000");
        assert_eq!(card.links.links[0].href, "https://instagram.com/ana");
        assert_eq!(card.photo.to_css(), "translate(10px, 0px) scale(1.5)");
        assert_eq!(card.vcard().filename, "Ana_Silva.vcf");
    }

    #[test]
    fn qr_svg_uses_card_style() {
        let card = PublicCard::from_profile(Uid::new("u1"), Profile::default(), "https://cards.test");
        let svg = card.qr_svg(&QrStyle::card()).expect("svg");
        assert!(svg.contains("#111827"));
    }

    #[test]
    fn pdf_page_follows_snapshot_size() {
        let card = PublicCard::from_profile(Uid::new("u1"), Profile::default(), "https://cards.test");
        let mut png = Vec::new();
        image_png(400, 600, &mut png);
        let (geometry, pdf) = card.pdf_from_snapshot(&png).expect("pdf");
        assert_eq!(geometry.to_string(), "105.83mm 158.75mm");
        assert!(pdf.starts_with(b"%PDF"));
    }

    fn image_png(w: u32, h: u32, out: &mut Vec<u8>) {
        use image::{DynamicImage, ImageFormat, RgbaImage};
        DynamicImage::ImageRgba8(RgbaImage::new(w, h))
            .write_to(&mut Cursor::new(out), ImageFormat::Png)
            .expect("encode");
    }
}
