// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Narrow interfaces to the collaborators the export pipeline does not own:
// identity, document storage, blob storage, the rendering layer, and the
// platform share/clipboard surfaces.
//
// All I/O-bound capabilities are async and object-safe so sessions can hold
// them as `Arc<dyn Trait>`.

use async_trait::async_trait;
use cartao_core::error::Result;
use cartao_core::{HumanError, Identity, PhotoFile, PreviewRef, Uid};
use serde_json::Value;

/// Who is signed in. Replaces observing a global auth-state listener.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is.
    async fn current_identity(&self) -> Result<Option<Identity>>;

    /// End the provider-side session.
    async fn sign_out(&self) -> Result<()>;
}

/// One JSON document per uid, always overwritten as a whole.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the full stored document. `Ok(None)` means "not found".
    async fn load(&self, uid: &Uid) -> Result<Option<Value>>;

    /// Replace the stored document for `uid` (upsert, no field-level merge).
    async fn save(&self, uid: &Uid, document: &Value) -> Result<()>;
}

/// Write-once object storage returning publicly fetchable URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path` and return the durable fetch URL.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;
}

/// Issues transient local references for just-picked files.
pub trait PreviewRegistry: Send + Sync {
    /// Create a displayable reference for `file`.
    fn create(&self, file: &PhotoFile) -> PreviewRef;

    /// Give the reference back; it must not be displayed afterwards.
    fn release(&self, preview: &PreviewRef);
}

/// Shows notices to the user (toast, alert, stderr...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: HumanError);
}

/// Measures the rendered card, supplied by the rendering layer.
pub trait CardMeasure {
    /// Pixel box `(width, height)` of the card, or `None` while the card is
    /// not mounted or cannot be measured yet.
    fn measure(&self) -> Option<(f64, f64)>;
}

/// The OS share sheet.
#[async_trait]
pub trait ShareSheet: Send + Sync {
    /// Whether the platform offers a share sheet at all.
    fn is_available(&self) -> bool;

    /// Share a link. Returns `Ok(false)` when the user dismissed the sheet.
    async fn share(&self, title: &str, text: &str, url: &str) -> Result<bool>;
}

/// The system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Blob path for an uploaded avatar: `avatars/<uid>/<timestamp>_<filename>`.
pub fn avatar_blob_path(uid: &Uid, timestamp_millis: i64, file_name: &str) -> String {
    format!("avatars/{uid}/{timestamp_millis}_{file_name}")
}
