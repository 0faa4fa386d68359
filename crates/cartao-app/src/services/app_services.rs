// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — opens the local stores and hands out sessions,
// editors and upload coordinators to the commands.
//
// Avatars are written below `<data_dir>/blobs` and addressed as
// `<origin>/blobs/<path>`; whatever serves the card is expected to serve that
// directory too.

use std::path::Path;
use std::sync::Arc;

use cartao_bridge::memory::MemoryPreviews;
use cartao_bridge::{BlobStore, DocumentStore, Notifier};
use cartao_core::error::Result;
use cartao_core::AppConfig;
use cartao_session::{ProfileEditor, SessionContext, UploadCoordinator};
use cartao_store::{FsBlobStore, SqliteProfileStore};
use tracing::info;

use super::data_dir;
use super::identity::LocalIdentity;
use super::notifier::StderrNotifier;

/// Shared application services.
///
/// All fields are cheaply cloneable (Arc-wrapped).
#[derive(Clone)]
pub struct AppServices {
    store: Arc<SqliteProfileStore>,
    blobs: Arc<FsBlobStore>,
    notifier: Arc<dyn Notifier>,
    config: AppConfig,
}

impl AppServices {
    /// Open the data directory, the profile database and the blob tree.
    pub fn init(explicit_dir: Option<&Path>) -> Result<Self> {
        let dir = data_dir::data_dir(explicit_dir);
        info!(path = %dir.display(), "initialising app services");

        let config = AppConfig::load(&dir);
        config.validate()?;

        let store = SqliteProfileStore::open(dir.join("profiles.db"))?;
        let blobs = FsBlobStore::new(
            data_dir::data_subdir(&dir, "blobs"),
            format!("{}/blobs", config.origin.trim_end_matches('/')),
        );

        info!(origin = %config.origin, "app services initialised");
        Ok(Self {
            store: Arc::new(store),
            blobs: Arc::new(blobs),
            notifier: Arc::new(StderrNotifier),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &SqliteProfileStore {
        &self.store
    }

    /// Start a session for the identity given on the command line.
    pub async fn session(&self, identity: LocalIdentity) -> Result<SessionContext> {
        let mut session = SessionContext::new(Arc::new(identity));
        session.start().await?;
        Ok(session)
    }

    /// Load the session owner's profile for editing.
    pub async fn editor(&self, session: &SessionContext) -> Result<ProfileEditor> {
        let store: Arc<dyn DocumentStore> = self.store.clone();
        ProfileEditor::load(session, store, Arc::clone(&self.notifier), &self.config).await
    }

    /// Upload coordinator for `editor`, writing into the blob tree.
    pub fn uploads(&self, editor: &ProfileEditor) -> UploadCoordinator {
        let blobs: Arc<dyn BlobStore> = self.blobs.clone();
        editor.upload_coordinator(blobs, Arc::new(MemoryPreviews::new()), self.config.max_photo_bytes)
    }
}
