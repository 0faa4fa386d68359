// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Replace the card with a profile document.

use std::path::PathBuf;

use anyhow::Context;
use cartao_core::Profile;
use serde_json::Value;

use super::open_editor;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

pub async fn run(svc: &AppServices, identity: LocalIdentity, path: PathBuf) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&data)
        .with_context(|| format!("{} is not JSON", path.display()))?;

    let editor = open_editor(svc, identity).await?;
    let imported = Profile::from_document(&document, None);
    editor.update(|profile| *profile = imported);
    editor.save().await?;

    println!("Imported {} into {}", path.display(), editor.uid());
    Ok(())
}
