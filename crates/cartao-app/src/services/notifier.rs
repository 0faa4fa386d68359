// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notices printed to the terminal.

use cartao_bridge::Notifier;
use cartao_core::{HumanError, Severity};

/// Writes notices to stderr so stdout stays clean for exported data.
pub struct StderrNotifier;

impl StderrNotifier {
    /// One-line rendering of a notice.
    pub fn render(notice: &HumanError) -> String {
        let tag = match notice.severity {
            Severity::Info => "info",
            Severity::Transient => "retry",
            Severity::ActionRequired => "action",
            Severity::Permanent => "error",
        };
        if notice.suggestion.is_empty() {
            format!("[{tag}] {}", notice.message)
        } else {
            format!("[{tag}] {} {}", notice.message, notice.suggestion)
        }
    }
}

impl Notifier for StderrNotifier {
    fn notify(&self, notice: HumanError) {
        eprintln!("{}", Self::render(&notice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartao_core::error::CartaoError;
    use cartao_core::humanize_error;

    #[test]
    fn info_notice_has_no_suggestion() {
        assert_eq!(StderrNotifier::render(&HumanError::info("Card saved.")), "[info] Card saved.");
    }

    #[test]
    fn error_notice_includes_suggestion() {
        let notice = humanize_error(&CartaoError::PhotoTooLarge {
            size: 3 * 1024 * 1024,
            limit: 2 * 1024 * 1024,
        });
        let line = StderrNotifier::render(&notice);
        assert!(line.starts_with("[action] "));
        assert!(line.ends_with("Choose an image up to 2 MB."));
    }
}
