// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Profile photo commands: upload, removal, framing and avatar rendering.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use cartao_core::PhotoFile;
use cartao_export::{PhotoTransform, load_photo, render_avatar};
use cartao_session::UploadOutcome;

use super::open_editor;
use crate::services::app_services::AppServices;
use crate::services::identity::LocalIdentity;

/// Read a local image the way a file picker hands it over.
fn pick_file(path: &Path) -> anyhow::Result<PhotoFile> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("photo path has no file name")?;
    let content_type = PhotoFile::content_type_for(&name);
    Ok(PhotoFile::new(name, content_type, bytes))
}

pub async fn upload(svc: &AppServices, identity: LocalIdentity, path: PathBuf) -> anyhow::Result<()> {
    let file = pick_file(&path)?;
    let editor = open_editor(svc, identity).await?;

    // The coordinator reports problems through the notifier itself.
    match svc.uploads(&editor).select_file(file).await {
        UploadOutcome::Uploaded { url, auto_saved } => {
            println!("{url}");
            if !auto_saved {
                bail!("photo uploaded but the card could not be saved");
            }
            Ok(())
        }
        UploadOutcome::Rejected { size, limit } => {
            bail!("photo is {size} bytes, the limit is {limit}")
        }
        UploadOutcome::Busy => bail!("another upload is in progress"),
        UploadOutcome::Failed { reason } => bail!("upload failed: {reason}"),
    }
}

pub async fn remove(svc: &AppServices, identity: LocalIdentity) -> anyhow::Result<()> {
    let editor = open_editor(svc, identity).await?;
    editor.remove_photo();
    editor.save().await?;
    Ok(())
}

pub async fn frame(
    svc: &AppServices,
    identity: LocalIdentity,
    zoom: Option<f64>,
    offset_x: Option<f64>,
    offset_y: Option<f64>,
    clamp: bool,
) -> anyhow::Result<()> {
    let editor = open_editor(svc, identity).await?;

    let current = PhotoTransform::from_profile(&editor.profile());
    let mut next = PhotoTransform::new(
        zoom.unwrap_or(current.zoom),
        offset_x.unwrap_or(current.offset_x),
        offset_y.unwrap_or(current.offset_y),
    );
    if clamp {
        next = next.clamped();
    }

    editor.update(|profile| {
        profile.photo_zoom = next.zoom;
        profile.photo_offset_x = next.offset_x;
        profile.photo_offset_y = next.offset_y;
    });
    editor.save().await?;
    println!("transform: {}", next.to_css());
    Ok(())
}

/// Render the framed, circular avatar using the stored transform.
pub async fn avatar(
    svc: &AppServices,
    identity: LocalIdentity,
    photo: PathBuf,
    size: u32,
    output: PathBuf,
) -> anyhow::Result<()> {
    if size == 0 {
        bail!("avatar size must be positive");
    }
    let editor = open_editor(svc, identity).await?;
    let transform = PhotoTransform::from_profile(&editor.profile());

    let bytes = std::fs::read(&photo).with_context(|| format!("failed to read {}", photo.display()))?;
    let image = load_photo(&bytes)?;
    render_avatar(&image, size, &transform)
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Wrote {} ({size}px, {})", output.display(), transform.to_css());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picked_file_carries_name_and_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Me.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).expect("write");

        let file = pick_file(&path).expect("pick");
        assert_eq!(file.name, "Me.JPG");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.size(), 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(pick_file(Path::new("/nonexistent/photo.png")).is_err());
    }
}
