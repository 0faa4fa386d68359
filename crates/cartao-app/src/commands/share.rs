// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Share the card link. A terminal has no share sheet, so the link goes to
// the clipboard (stdout).

use cartao_bridge::memory::UnavailableShareSheet;
use cartao_session::ShareOutcome;

use super::open_editor;
use crate::services::app_services::AppServices;
use crate::services::clipboard::StdoutClipboard;
use crate::services::identity::LocalIdentity;

pub async fn run(svc: &AppServices, identity: LocalIdentity) -> anyhow::Result<()> {
    let editor = open_editor(svc, identity).await?;
    match editor.share(&UnavailableShareSheet, &StdoutClipboard).await? {
        ShareOutcome::Copied => {}
        outcome => tracing::debug!(?outcome, "share finished"),
    }
    Ok(())
}
