// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal stand-in for the system clipboard.

use std::io::Write;

use async_trait::async_trait;
use cartao_bridge::Clipboard;
use cartao_core::error::Result;

/// Writes copied text to stdout, one item per line, so it can be piped into
/// `xclip`, `pbcopy` and friends.
pub struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}
