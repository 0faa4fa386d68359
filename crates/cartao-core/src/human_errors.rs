// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable notices for the card owner.
//
// Every technical error is mapped to plain English with a clear suggestion.
// None of them is fatal: each one is recoverable by repeating the action.

use crate::error::CartaoError;

/// Severity of a notice from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation only, nothing went wrong (e.g. "link copied").
    Info,
    /// Network blip or storage hiccup: trying again will probably work.
    Transient,
    /// User must do something (pick a smaller photo, sign in again).
    ActionRequired,
    /// Cannot be fixed by retrying (unsupported feature, corrupt file).
    Permanent,
}

/// A user-visible notice with a plain English message and actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same action can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in the UI).
    pub severity: Severity,
}

impl HumanError {
    /// An informational notice with no suggestion attached.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: String::new(),
            retriable: false,
            severity: Severity::Info,
        }
    }
}

/// Convert a `CartaoError` into a `HumanError` the card owner can act on.
pub fn humanize_error(err: &CartaoError) -> HumanError {
    match err {
        // -- Session --
        CartaoError::NotSignedIn => HumanError {
            message: "You're not signed in.".into(),
            suggestion: "Sign in again to keep editing your card.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        CartaoError::Identity(_) => HumanError {
            message: "We couldn't check who you are.".into(),
            suggestion: "Check your connection and try signing in again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Document store --
        CartaoError::DocumentRead(_) => HumanError {
            message: "We couldn't load your card.".into(),
            suggestion: "Check your connection and reload. Anything you type now is kept until you save.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        CartaoError::DocumentWrite(_) => HumanError {
            message: "Your card couldn't be saved.".into(),
            suggestion: "Your changes are still here. Check your connection and press Save again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        CartaoError::ProfileNotLoaded => HumanError {
            message: "Your saved card couldn't be loaded, so it wasn't overwritten.".into(),
            suggestion: "Reload your card, then make your changes again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Photo upload --
        CartaoError::PhotoTooLarge { limit, .. } => HumanError {
            message: "That photo is too big.".into(),
            suggestion: format!(
                "Choose an image up to {} MB.",
                limit.div_ceil(1024 * 1024)
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        CartaoError::UploadInProgress => HumanError {
            message: "A photo is already being sent.".into(),
            suggestion: "Wait for the current upload to finish, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        CartaoError::BlobUpload(_) | CartaoError::InvalidBlobPath(_) => HumanError {
            message: "We couldn't send your photo.".into(),
            suggestion: "Your previous photo is unchanged. Check your connection and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Export --
        CartaoError::QrEncode(_) => HumanError {
            message: "We couldn't create the QR code.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        CartaoError::PdfError(_) => HumanError {
            message: "We couldn't create the PDF.".into(),
            suggestion: "Wait for the card to finish loading, then export again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        CartaoError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage --
        CartaoError::Database(_) => HumanError {
            message: "The app's data storage had a problem.".into(),
            suggestion: "Try closing and reopening the app. Your saved card should still be there.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        CartaoError::Config(detail) => HumanError {
            message: "The app settings look wrong.".into(),
            suggestion: format!("Check the configuration file. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        CartaoError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or try copying the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        CartaoError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Platform --
        CartaoError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Copy the link instead and paste it where you want to share it.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_photo_is_action_required() {
        let err = CartaoError::PhotoTooLarge {
            size: 3 * 1024 * 1024,
            limit: 2 * 1024 * 1024,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("2 MB"));
    }

    #[test]
    fn upload_failure_is_transient() {
        let human = humanize_error(&CartaoError::BlobUpload("403 forbidden".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn save_failure_keeps_changes_message() {
        let human = humanize_error(&CartaoError::DocumentWrite("timeout".into()));
        assert!(human.suggestion.contains("still here"));
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = CartaoError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn info_notice_has_no_suggestion() {
        let notice = HumanError::info("Link copied");
        assert_eq!(notice.severity, Severity::Info);
        assert!(notice.suggestion.is_empty());
    }
}
