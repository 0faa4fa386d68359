// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photo upload state machine: idle <-> uploading, one upload per session.
//
// idle -> uploading      a file within the size ceiling was picked; a
//                        transient preview is shown
// uploading -> idle ok   blob stored, photo URL set on the shared profile,
//                        whole profile auto-saved, preview released
// uploading -> idle err  notice shown, photo URL untouched, preview released
//
// Oversized files are rejected before the transition. A pick while uploading
// is refused; the running upload is never aborted.

use std::sync::{Arc, Mutex, PoisonError};

use cartao_bridge::{BlobStore, DocumentStore, Notifier, PreviewRegistry, avatar_blob_path};
use cartao_core::error::CartaoError;
use cartao_core::{PhotoFile, PreviewRef, Uid, humanize_error};
use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::editor::SharedProfile;

/// Coordinator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading { preview: PreviewRef },
}

/// Result of [`UploadCoordinator::select_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Over the size ceiling; nothing was uploaded.
    Rejected { size: u64, limit: u64 },
    /// Another upload is in flight; this pick was ignored.
    Busy,
    /// Stored at `url`. `auto_saved` is false when the follow-up profile
    /// write failed (the URL is still set in memory).
    Uploaded { url: String, auto_saved: bool },
    /// The blob store refused the upload.
    Failed { reason: String },
}

pub struct UploadCoordinator {
    uid: Uid,
    profile: SharedProfile,
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    previews: Arc<dyn PreviewRegistry>,
    notifier: Arc<dyn Notifier>,
    max_bytes: u64,
    auto_save: bool,
    state: Mutex<UploadState>,
}

/// Returns the coordinator to idle and releases the preview when dropped,
/// including when the upload future itself is dropped mid-flight.
struct InFlight<'a> {
    coordinator: &'a UploadCoordinator,
    preview: PreviewRef,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self
            .coordinator
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = UploadState::Idle;
        self.coordinator.previews.release(&self.preview);
        debug!(preview = %self.preview, "preview released");
    }
}

impl UploadCoordinator {
    pub fn new(
        uid: Uid,
        profile: SharedProfile,
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        previews: Arc<dyn PreviewRegistry>,
        notifier: Arc<dyn Notifier>,
        max_bytes: u64,
    ) -> Self {
        Self {
            uid,
            profile,
            store,
            blobs,
            previews,
            notifier,
            max_bytes,
            auto_save: true,
            state: Mutex::new(UploadState::Idle),
        }
    }

    /// Turn the post-upload profile write on or off. Off when the editor
    /// never managed to read the stored profile, since writing the whole
    /// in-memory document would replace it.
    pub fn with_auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }

    pub fn state(&self) -> UploadState {
        self.state.lock().expect("upload state lock poisoned").clone()
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state(), UploadState::Uploading { .. })
    }

    /// What the avatar should show right now: the transient preview while
    /// uploading, otherwise the durable photo URL.
    pub fn displayed_photo(&self) -> Option<String> {
        if let UploadState::Uploading { preview } = self.state() {
            return Some(preview.0);
        }
        self.profile
            .lock()
            .expect("profile lock poisoned")
            .photo()
            .map(str::to_owned)
    }

    /// Handle a picked file.
    #[instrument(skip(self, file), fields(uid = %self.uid, name = %file.name, size = file.size()))]
    pub async fn select_file(&self, file: PhotoFile) -> UploadOutcome {
        let size = file.size();
        if size > self.max_bytes {
            warn!(limit = self.max_bytes, "photo rejected, over size ceiling");
            self.notifier.notify(humanize_error(&CartaoError::PhotoTooLarge {
                size,
                limit: self.max_bytes,
            }));
            return UploadOutcome::Rejected {
                size,
                limit: self.max_bytes,
            };
        }

        let Some(in_flight) = self.begin(&file) else {
            debug!("upload already in flight, ignoring pick");
            self.notifier.notify(humanize_error(&CartaoError::UploadInProgress));
            return UploadOutcome::Busy;
        };

        let path = avatar_blob_path(&self.uid, Utc::now().timestamp_millis(), &file.name);
        let url = match self.blobs.put(&path, file.bytes, &file.content_type).await {
            Ok(url) => url,
            Err(e) => {
                error!(%path, "photo upload failed: {e}");
                self.notifier.notify(humanize_error(&e));
                drop(in_flight);
                return UploadOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };
        info!(%url, "photo uploaded");

        let document = {
            let mut profile = self.profile.lock().expect("profile lock poisoned");
            profile.photo_url = url.clone();
            profile.to_document()
        };
        if !self.auto_save {
            warn!("stored profile was not loaded, skipping auto-save");
            self.notifier.notify(humanize_error(&CartaoError::ProfileNotLoaded));
            drop(in_flight);
            return UploadOutcome::Uploaded {
                url,
                auto_saved: false,
            };
        }
        let auto_saved = match self.store.save(&self.uid, &document).await {
            Ok(()) => {
                debug!("profile auto-saved after upload");
                true
            }
            Err(e) => {
                error!("auto-save after upload failed: {e}");
                self.notifier.notify(humanize_error(&e));
                false
            }
        };

        drop(in_flight);
        UploadOutcome::Uploaded { url, auto_saved }
    }

    /// idle -> uploading. `None` when already uploading.
    fn begin(&self, file: &PhotoFile) -> Option<InFlight<'_>> {
        let mut state = self.state.lock().expect("upload state lock poisoned");
        if *state != UploadState::Idle {
            return None;
        }
        let preview = self.previews.create(file);
        *state = UploadState::Uploading {
            preview: preview.clone(),
        };
        Some(InFlight {
            coordinator: self,
            preview,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartao_bridge::memory::{MemoryBlobStore, MemoryDocumentStore, MemoryPreviews, RecordingNotifier};
    use cartao_core::{Profile, Severity};

    const MIB: usize = 1024 * 1024;
    const OLD_URL: &str = "https://cdn.test/avatars/u1/1_old.jpg";

    struct Fixture {
        profile: SharedProfile,
        store: Arc<MemoryDocumentStore>,
        blobs: Arc<MemoryBlobStore>,
        previews: Arc<MemoryPreviews>,
        notifier: Arc<RecordingNotifier>,
    }

    impl Fixture {
        fn new(blobs: MemoryBlobStore) -> Self {
            let profile = Profile {
                name: "Ana".into(),
                photo_url: OLD_URL.into(),
                ..Profile::default()
            };
            Self {
                profile: Arc::new(Mutex::new(profile)),
                store: Arc::new(MemoryDocumentStore::new()),
                blobs: Arc::new(blobs),
                previews: Arc::new(MemoryPreviews::new()),
                notifier: Arc::new(RecordingNotifier::new()),
            }
        }

        fn coordinator(&self) -> UploadCoordinator {
            UploadCoordinator::new(
                Uid::new("u1"),
                Arc::clone(&self.profile),
                self.store.clone(),
                self.blobs.clone(),
                self.previews.clone(),
                self.notifier.clone(),
                2 * MIB as u64,
            )
        }

        fn photo_url(&self) -> String {
            self.profile.lock().expect("profile lock").photo_url.clone()
        }
    }

    fn photo(len: usize) -> PhotoFile {
        PhotoFile::new("me.jpg", "image/jpeg", vec![0xAB; len])
    }

    #[tokio::test]
    async fn success_sets_url_auto_saves_and_releases_preview() {
        let f = Fixture::new(MemoryBlobStore::new("https://cdn.test"));
        let coordinator = f.coordinator();

        let outcome = coordinator.select_file(photo(1024)).await;
        let UploadOutcome::Uploaded { url, auto_saved } = outcome else {
            panic!("expected upload, got {outcome:?}");
        };
        assert!(auto_saved);
        assert!(url.starts_with("https://cdn.test/avatars/u1/"));
        assert!(url.ends_with("_me.jpg"));

        assert_eq!(f.photo_url(), url);
        let stored = f.store.get(&Uid::new("u1")).expect("auto-saved");
        assert_eq!(stored["photoUrl"], url.as_str());
        assert_eq!(stored["name"], "Ana");

        assert_eq!(coordinator.state(), UploadState::Idle);
        assert_eq!(f.previews.created_count(), 1);
        assert_eq!(f.previews.live_count(), 0);
        assert!(f.notifier.notices().is_empty());
        assert_eq!(coordinator.displayed_photo(), Some(url));
    }

    #[tokio::test]
    async fn storage_rejection_keeps_previous_photo() {
        let f = Fixture::new(MemoryBlobStore::new("https://cdn.test"));
        f.blobs.fail_uploads(true);
        let coordinator = f.coordinator();

        let outcome = coordinator.select_file(photo(1024)).await;
        assert!(matches!(outcome, UploadOutcome::Failed { .. }));

        assert_eq!(f.photo_url(), OLD_URL);
        assert_eq!(f.store.write_count(), 0);
        let notices = f.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Transient);
        assert_eq!(f.previews.live_count(), 0);
        assert_eq!(coordinator.state(), UploadState::Idle);
        assert_eq!(coordinator.displayed_photo().as_deref(), Some(OLD_URL));
    }

    #[tokio::test]
    async fn oversized_file_never_uploads() {
        let f = Fixture::new(MemoryBlobStore::new("https://cdn.test"));
        let coordinator = f.coordinator();

        let outcome = coordinator.select_file(photo(3 * MIB)).await;
        assert_eq!(
            outcome,
            UploadOutcome::Rejected {
                size: 3 * MIB as u64,
                limit: 2 * MIB as u64
            }
        );
        assert_eq!(f.blobs.put_count(), 0);
        assert_eq!(f.previews.created_count(), 0);
        assert_eq!(coordinator.state(), UploadState::Idle);
        assert_eq!(f.photo_url(), OLD_URL);

        let notices = f.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::ActionRequired);
    }

    #[tokio::test]
    async fn file_at_the_ceiling_is_accepted() {
        let f = Fixture::new(MemoryBlobStore::new("https://cdn.test"));
        let outcome = f.coordinator().select_file(photo(2 * MIB)).await;
        assert!(matches!(outcome, UploadOutcome::Uploaded { .. }));
        assert_eq!(f.blobs.put_count(), 1);
    }

    #[tokio::test]
    async fn second_pick_while_uploading_is_refused() {
        let (blobs, gate) = MemoryBlobStore::gated("https://cdn.test");
        let f = Fixture::new(blobs);
        let coordinator = f.coordinator();

        let first = coordinator.select_file(photo(10));
        let second = async {
            // Let the first pick reach the blob store.
            tokio::task::yield_now().await;
            assert!(coordinator.is_uploading());
            let shown = coordinator.displayed_photo().expect("preview shown");
            assert!(shown.starts_with("preview:"));

            let outcome = coordinator.select_file(photo(10)).await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, UploadOutcome::Uploaded { .. }));
        assert_eq!(second, UploadOutcome::Busy);
        assert_eq!(f.blobs.put_count(), 1);
        assert_eq!(f.previews.created_count(), 1);
        assert_eq!(f.previews.live_count(), 0);
        assert!(!coordinator.is_uploading());
    }

    #[tokio::test]
    async fn auto_save_failure_keeps_url_in_memory() {
        let f = Fixture::new(MemoryBlobStore::new("https://cdn.test"));
        f.store.fail_writes(true);
        let coordinator = f.coordinator();

        let outcome = coordinator.select_file(photo(10)).await;
        let UploadOutcome::Uploaded { url, auto_saved } = outcome else {
            panic!("expected upload, got {outcome:?}");
        };
        assert!(!auto_saved);
        assert_eq!(f.photo_url(), url);
        assert_eq!(f.notifier.notices().len(), 1);
        assert_eq!(f.previews.live_count(), 0);
    }

    #[tokio::test]
    async fn no_auto_save_without_loaded_profile() {
        let f = Fixture::new(MemoryBlobStore::new("https://cdn.test"));
        let coordinator = f.coordinator().with_auto_save(false);

        let outcome = coordinator.select_file(photo(10)).await;
        let UploadOutcome::Uploaded { url, auto_saved } = outcome else {
            panic!("expected upload, got {outcome:?}");
        };
        assert!(!auto_saved);
        assert_eq!(f.photo_url(), url);
        assert_eq!(f.store.write_count(), 0);

        let notices = f.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0], humanize_error(&CartaoError::ProfileNotLoaded));
        assert_eq!(f.previews.live_count(), 0);
        assert_eq!(coordinator.state(), UploadState::Idle);
    }

    #[test]
    fn release_survives_poisoned_state_lock() {
        let f = Fixture::new(MemoryBlobStore::new("https://cdn.test"));
        let coordinator = f.coordinator();
        let preview = f.previews.create(&photo(10));
        *coordinator.state.lock().expect("state") = UploadState::Uploading {
            preview: preview.clone(),
        };

        let poisoned = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = coordinator.state.lock().expect("state");
                panic!("poison the state lock");
            })
            .join()
        });
        assert!(poisoned.is_err());
        assert!(coordinator.state.is_poisoned());

        drop(InFlight {
            coordinator: &coordinator,
            preview,
        });
        let state = coordinator.state.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(state, UploadState::Idle);
        assert_eq!(f.previews.live_count(), 0);
    }

    #[tokio::test]
    async fn dropped_upload_returns_to_idle() {
        let (blobs, _gate) = MemoryBlobStore::gated("https://cdn.test");
        let f = Fixture::new(blobs);
        let coordinator = f.coordinator();
        {
            let pending = coordinator.select_file(photo(10));
            tokio::pin!(pending);
            // Poll once so the upload starts, then give up on it.
            assert!(poll_once(pending.as_mut()).await.is_none());
            assert!(coordinator.is_uploading());
        }
        assert!(!coordinator.is_uploading());
        assert_eq!(f.previews.live_count(), 0);
        assert_eq!(f.photo_url(), OLD_URL);
    }

    /// Poll `fut` exactly once.
    async fn poll_once<F: Future + Unpin>(fut: F) -> Option<F::Output> {
        let mut fut = fut;
        std::future::poll_fn(|cx| {
            std::task::Poll::Ready(match std::pin::Pin::new(&mut fut).poll(cx) {
                std::task::Poll::Ready(out) => Some(out),
                std::task::Poll::Pending => None,
            })
        })
        .await
    }
}
