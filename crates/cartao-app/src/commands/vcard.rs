// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Save a card's contact as a vCard.

use std::path::PathBuf;

use anyhow::Context;

use super::load_card;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

pub async fn run(
    svc: &AppServices,
    identity: LocalIdentity,
    card: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let file = load_card(svc, identity, card).await?.vcard();
    let path = output.unwrap_or_else(|| PathBuf::from(&file.filename));

    std::fs::write(&path, file.body.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(mime = file.mime, "vCard written");
    println!("Wrote {}", path.display());
    Ok(())
}
