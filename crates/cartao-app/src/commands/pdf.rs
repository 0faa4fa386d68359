// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print a card to PDF from a rendered snapshot.

use std::path::PathBuf;

use anyhow::Context;

use super::load_card;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

pub async fn run(
    svc: &AppServices,
    identity: LocalIdentity,
    card: Option<String>,
    snapshot: PathBuf,
    output: PathBuf,
) -> anyhow::Result<()> {
    let card = load_card(svc, identity, card).await?;
    let image = std::fs::read(&snapshot)
        .with_context(|| format!("failed to read {}", snapshot.display()))?;

    let (geometry, pdf) = card.pdf_from_snapshot(&image)?;
    std::fs::write(&output, pdf).with_context(|| format!("failed to write {}", output.display()))?;

    println!("Wrote {} ({geometry})", output.display());
    Ok(())
}
