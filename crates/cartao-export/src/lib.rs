// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cartao-export — Turns a contact profile into its shareable forms: vCard
// text, a QR code for the share URL, the avatar display transform, and a
// print page (CSS geometry or PDF) matching the rendered card.

pub mod pdf;
pub mod photo;
pub mod print;
pub mod qr;
pub mod vcard;

// Re-export the primary types so callers can use `cartao_export::VCardEncoder` etc.
pub use pdf::writer::CardPdfWriter;
pub use photo::avatar::{load_photo, render_avatar};
pub use photo::transform::PhotoTransform;
pub use print::layout::{PageGeometry, PrintLayoutCalculator, RasterMeasure};
pub use qr::{QrPayload, QrPayloadBuilder};
pub use vcard::{VCardEncoder, VCardFile};
