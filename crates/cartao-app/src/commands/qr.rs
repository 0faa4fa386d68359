// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Write the QR code for the signed-in user's share URL.

use std::path::PathBuf;

use anyhow::Context;
use cartao_core::QrStyle;

use super::open_editor;
use crate::QrFormat;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

pub async fn run(
    svc: &AppServices,
    identity: LocalIdentity,
    format: QrFormat,
    output: PathBuf,
) -> anyhow::Result<()> {
    let editor = open_editor(svc, identity).await?;
    let payload = editor.qr()?;

    // The raster is the dashboard code; the vector one is the card's.
    let bytes = match format {
        QrFormat::Png => payload.to_png(&svc.config().qr)?,
        QrFormat::Svg => payload.to_svg(&QrStyle::card()).into_bytes(),
    };
    std::fs::write(&output, bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("{} -> {}", payload.url(), output.display());
    Ok(())
}
