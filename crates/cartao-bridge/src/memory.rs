// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory bridge implementations for tests, demos, and desktop builds
// without platform services.
//
// Stores can be told to fail so the error paths of the pipeline are
// reachable without a network.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use cartao_core::error::{CartaoError, Result};
use cartao_core::{HumanError, Identity, PhotoFile, PreviewRef, Uid};
use serde_json::Value;
use tokio::sync::Notify;

use crate::traits::*;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identity provider with a fixed (or absent) signed-in user.
#[derive(Default)]
pub struct StaticIdentity {
    current: Mutex<Option<Identity>>,
}

impl StaticIdentity {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            current: Mutex::new(Some(identity)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self.current.lock().expect("identity lock poisoned").clone())
    }

    async fn sign_out(&self) -> Result<()> {
        self.current.lock().expect("identity lock poisoned").take();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// Document store holding one JSON value per uid.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<Uid, Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a stored record.
    pub fn with_document(self, uid: impl Into<Uid>, document: Value) -> Self {
        self.documents
            .lock()
            .expect("documents lock poisoned")
            .insert(uid.into(), document);
        self
    }

    /// Make every subsequent `load` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `save` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The stored document for `uid`, if any.
    pub fn get(&self, uid: &Uid) -> Option<Value> {
        self.documents.lock().expect("documents lock poisoned").get(uid).cloned()
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self, uid: &Uid) -> Result<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CartaoError::DocumentRead("simulated read failure".into()));
        }
        Ok(self.get(uid))
    }

    async fn save(&self, uid: &Uid, document: &Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CartaoError::DocumentWrite("simulated write failure".into()));
        }
        self.documents
            .lock()
            .expect("documents lock poisoned")
            .insert(uid.clone(), document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

/// Blob store keeping objects in a map and serving them from `base_url`.
pub struct MemoryBlobStore {
    base_url: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    puts: AtomicUsize,
    fail: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
            puts: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gate: None,
        }
    }

    /// Hold every `put` until the returned handle is notified.
    pub fn gated(base_url: impl Into<String>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let store = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::new(base_url)
        };
        (store, gate)
    }

    /// Make every subsequent `put` fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `put` calls received, successful or not.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Paths of all stored objects.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .objects
            .lock()
            .expect("objects lock poisoned")
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CartaoError::BlobUpload("simulated storage rejection".into()));
        }
        let mut objects = self.objects.lock().expect("objects lock poisoned");
        if objects.contains_key(path) {
            return Err(CartaoError::BlobUpload(format!("object already exists: {path}")));
        }
        objects.insert(path.to_owned(), bytes);
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), path))
    }
}

// ---------------------------------------------------------------------------
// Previews
// ---------------------------------------------------------------------------

/// Preview registry handing out `preview:<uuid>` references.
#[derive(Default)]
pub struct MemoryPreviews {
    live: Mutex<HashSet<PreviewRef>>,
    created: AtomicUsize,
}

impl MemoryPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// References created and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.lock().expect("previews lock poisoned").len()
    }

    /// Total references ever created.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl PreviewRegistry for MemoryPreviews {
    fn create(&self, _file: &PhotoFile) -> PreviewRef {
        let preview = PreviewRef(format!("preview:{}", uuid::Uuid::new_v4()));
        self.live
            .lock()
            .expect("previews lock poisoned")
            .insert(preview.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        preview
    }

    fn release(&self, preview: &PreviewRef) {
        self.live.lock().expect("previews lock poisoned").remove(preview);
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// Notifier that records every notice it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<HumanError>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<HumanError> {
        self.notices.lock().expect("notices lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: HumanError) {
        self.notices.lock().expect("notices lock poisoned").push(notice);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Measurement capability returning a settable box.
#[derive(Default)]
pub struct FixedMeasure {
    current: Mutex<Option<(f64, f64)>>,
}

impl FixedMeasure {
    /// A card that is mounted with the given pixel box.
    pub fn mounted(width: f64, height: f64) -> Self {
        Self {
            current: Mutex::new(Some((width, height))),
        }
    }

    /// A card that is not mounted yet.
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// Change the box, e.g. after an image finished loading.
    pub fn set(&self, size: Option<(f64, f64)>) {
        *self.current.lock().expect("measure lock poisoned") = size;
    }
}

impl CardMeasure for FixedMeasure {
    fn measure(&self) -> Option<(f64, f64)> {
        *self.current.lock().expect("measure lock poisoned")
    }
}

// ---------------------------------------------------------------------------
// Share sheet / clipboard
// ---------------------------------------------------------------------------

/// Share sheet on a platform that has none.
pub struct UnavailableShareSheet;

#[async_trait]
impl ShareSheet for UnavailableShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _title: &str, _text: &str, _url: &str) -> Result<bool> {
        tracing::warn!("ShareSheet::share called on a platform without a share sheet");
        Err(CartaoError::PlatformUnavailable)
    }
}

/// Share sheet that records what was shared and reports a fixed outcome.
pub struct RecordingShareSheet {
    completes: bool,
    shared: Mutex<Vec<(String, String, String)>>,
}

impl RecordingShareSheet {
    /// `completes == false` simulates the user dismissing the sheet.
    pub fn new(completes: bool) -> Self {
        Self {
            completes,
            shared: Mutex::new(Vec::new()),
        }
    }

    /// `(title, text, url)` of every share request.
    pub fn shared(&self) -> Vec<(String, String, String)> {
        self.shared.lock().expect("share lock poisoned").clone()
    }
}

#[async_trait]
impl ShareSheet for RecordingShareSheet {
    fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, title: &str, text: &str, url: &str) -> Result<bool> {
        self.shared
            .lock()
            .expect("share lock poisoned")
            .push((title.to_owned(), text.to_owned(), url.to_owned()));
        Ok(self.completes)
    }
}

/// Clipboard holding the last written text.
#[derive(Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.text.lock().expect("clipboard lock poisoned").clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        *self.text.lock().expect("clipboard lock poisoned") = Some(text.to_owned());
        Ok(())
    }
}
