// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The owner's editing session over their single profile.
//
// The in-memory profile is shared with the upload coordinator. Every save
// snapshots the shared value at the moment of writing, so a save issued
// after an upload's auto-save carries the uploaded photo URL.

use std::sync::{Arc, Mutex};

use cartao_bridge::{BlobStore, Clipboard, DocumentStore, Notifier, PreviewRegistry, ShareSheet};
use cartao_core::error::{CartaoError, Result};
use cartao_core::{AppConfig, HumanError, OfficeUnit, Profile, Uid, humanize_error};
use cartao_export::{QrPayload, QrPayloadBuilder, VCardFile};
use tracing::{debug, error, info, instrument, warn};

use crate::context::SessionContext;
use crate::upload::UploadCoordinator;

/// The profile being edited, shared between the editor and the upload
/// coordinator. Never held across an await.
pub type SharedProfile = Arc<Mutex<Profile>>;

/// Text accompanying a shared card link.
pub const SHARE_TEXT: &str = "Check out my digital card!";

/// What [`ProfileEditor::share`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share sheet completed.
    Shared,
    /// The user dismissed the share sheet.
    Dismissed,
    /// No share sheet; the link went to the clipboard.
    Copied,
}

pub struct ProfileEditor {
    uid: Uid,
    profile: SharedProfile,
    /// False when the stored record exists but could not be read. Whole
    /// document writes are refused then, so the seeded fallback never
    /// replaces the real card.
    loaded: bool,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    units: Vec<OfficeUnit>,
    links: QrPayloadBuilder,
}

impl ProfileEditor {
    /// Load the session owner's profile.
    ///
    /// A missing record seeds a fresh profile from the identity. A failed
    /// read is reported and also falls back to the seeded profile, so the
    /// owner can keep editing, but [`save`](Self::save) refuses to write it.
    /// Only a session without a user is an error.
    #[instrument(skip_all)]
    pub async fn load(
        session: &SessionContext,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        config: &AppConfig,
    ) -> Result<Self> {
        let uid = session.uid()?.clone();
        let identity = session.identity();

        let (profile, loaded) = match store.load(&uid).await {
            Ok(Some(document)) => {
                debug!(%uid, "profile document loaded");
                (Profile::from_document(&document, identity), true)
            }
            Ok(None) => {
                info!(%uid, "no stored profile, seeding defaults");
                (Profile::seeded(identity), true)
            }
            Err(e) => {
                error!(%uid, "failed to load profile: {e}");
                notifier.notify(humanize_error(&e));
                (Profile::seeded(identity), false)
            }
        };

        Ok(Self {
            uid,
            profile: Arc::new(Mutex::new(profile)),
            loaded,
            store,
            notifier,
            units: config.units.clone(),
            links: QrPayloadBuilder::new(config.origin.clone()),
        })
    }

    /// Upload coordinator sharing this editor's profile, store and notifier.
    pub fn upload_coordinator(
        &self,
        blobs: Arc<dyn BlobStore>,
        previews: Arc<dyn PreviewRegistry>,
        max_bytes: u64,
    ) -> UploadCoordinator {
        UploadCoordinator::new(
            self.uid.clone(),
            Arc::clone(&self.profile),
            Arc::clone(&self.store),
            blobs,
            previews,
            Arc::clone(&self.notifier),
            max_bytes,
        )
        .with_auto_save(self.loaded)
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Snapshot of the current in-memory profile.
    pub fn profile(&self) -> Profile {
        self.profile.lock().expect("profile lock poisoned").clone()
    }

    /// Whether the stored profile was read (or known to be absent).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Edit the in-memory profile. Nothing is persisted until [`save`](Self::save).
    pub fn update(&self, edit: impl FnOnce(&mut Profile)) {
        let mut profile = self.profile.lock().expect("profile lock poisoned");
        edit(&mut *profile);
    }

    /// Write the whole current profile to the document store.
    ///
    /// On failure the notice is shown and the in-memory edits are kept.
    #[instrument(skip(self), fields(uid = %self.uid))]
    pub async fn save(&self) -> Result<()> {
        if !self.loaded {
            warn!("stored profile was not loaded, refusing to overwrite it");
            let err = CartaoError::ProfileNotLoaded;
            self.notifier.notify(humanize_error(&err));
            return Err(err);
        }
        let document = self.profile().to_document();
        match self.store.save(&self.uid, &document).await {
            Ok(()) => {
                info!("profile saved");
                self.notifier.notify(HumanError::info("Card saved."));
                Ok(())
            }
            Err(e) => {
                error!("failed to save profile: {e}");
                self.notifier.notify(humanize_error(&e));
                Err(e)
            }
        }
    }

    /// Drop the photo and reset its framing (in memory).
    pub fn remove_photo(&self) {
        self.update(Profile::clear_photo);
    }

    pub fn units(&self) -> &[OfficeUnit] {
        &self.units
    }

    /// Replace the address with the unit's address line, or clear it when
    /// `id` is `None` or unknown.
    pub fn select_unit(&self, id: Option<&str>) -> Option<OfficeUnit> {
        let unit = id.and_then(|id| self.units.iter().find(|u| u.id == id)).cloned();
        if unit.is_none() && id.is_some() {
            warn!(id, "unknown office unit, clearing address");
        }
        self.update(|profile| {
            profile.address = unit.iter().map(OfficeUnit::address_line).collect();
        });
        unit
    }

    /// The unit whose name appears in the first address line.
    pub fn selected_unit(&self) -> Option<OfficeUnit> {
        let profile = self.profile.lock().expect("profile lock poisoned");
        let first = profile.address.first()?;
        self.units.iter().find(|u| first.contains(&u.name)).cloned()
    }

    pub fn share_url(&self) -> String {
        self.links.share_url(&self.uid)
    }

    pub fn qr(&self) -> Result<QrPayload> {
        self.links.build(&self.uid)
    }

    pub fn vcard(&self) -> VCardFile {
        VCardFile::from_profile(&self.profile())
    }

    /// Offer the share URL through the share sheet, or copy it when the
    /// platform has none. Dismissing the sheet is not an error.
    #[instrument(skip_all, fields(uid = %self.uid))]
    pub async fn share(&self, sheet: &dyn ShareSheet, clipboard: &dyn Clipboard) -> Result<ShareOutcome> {
        let url = self.share_url();

        if sheet.is_available() {
            let title = format!("Digital card - {}", self.profile().name);
            return match sheet.share(&title, SHARE_TEXT, &url).await {
                Ok(true) => Ok(ShareOutcome::Shared),
                Ok(false) => {
                    debug!("share dismissed");
                    Ok(ShareOutcome::Dismissed)
                }
                Err(e) => {
                    debug!("share cancelled: {e}");
                    Ok(ShareOutcome::Dismissed)
                }
            };
        }

        match clipboard.write_text(&url).await {
            Ok(()) => {
                self.notifier.notify(HumanError::info("Link copied to the clipboard."));
                Ok(ShareOutcome::Copied)
            }
            Err(e) => {
                error!("failed to copy link: {e}");
                self.notifier.notify(humanize_error(&e));
                Err(e)
            }
        }
    }
}
