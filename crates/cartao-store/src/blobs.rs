// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Write-once avatar blobs on the local filesystem.
//
// Objects live under `root/<path>` and are served from `<public_base>/<path>`
// by whatever fronts the directory. An existing object is never overwritten.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use cartao_bridge::BlobStore;
use cartao_core::error::{CartaoError, Result};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

/// [`BlobStore`] writing into a directory tree.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into();
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_owned(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL of an object path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path)
    }

    /// Resolve `path` below the root. Only plain relative segments are
    /// accepted.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        let plain = !path.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(CartaoError::InvalidBlobPath(path.to_owned()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    CartaoError::BlobUpload(format!("object already exists: {path}"))
                }
                _ => CartaoError::BlobUpload(format!("create {path}: {e}")),
            })?;
        file.write_all(&bytes)
            .await
            .map_err(|e| CartaoError::BlobUpload(format!("write {path}: {e}")))?;
        file.flush()
            .await
            .map_err(|e| CartaoError::BlobUpload(format!("flush {path}: {e}")))?;

        debug!(content_type, target = %target.display(), "blob stored");
        let url = self.url_for(path);
        info!(%url, "avatar uploaded");
        Ok(url)
    }
}
