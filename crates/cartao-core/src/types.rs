// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared by every Cartao crate.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a profile owner.
///
/// Used verbatim in storage keys (`profiles/<uid>`, `avatars/<uid>/...`) and
/// in the share URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: Uid,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<Uid>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A preset office location the owner can pick as their card address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeUnit {
    /// Stable identifier (e.g. `sion`).
    pub id: String,
    /// Display name (e.g. `Unidade Sion`).
    pub name: String,
    /// Street line (e.g. `R. Califórnia, 200`).
    pub street: String,
}

impl OfficeUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, street: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            street: street.into(),
        }
    }

    /// The single address line stored on the profile when this unit is picked.
    pub fn address_line(&self) -> String {
        format!("{} - {}", self.name, self.street)
    }

    /// Built-in unit list used when the configuration does not provide one.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("sion", "Unidade Sion", "R. Califórnia, 200"),
            Self::new(
                "cidade-nova",
                "Unidade Cidade Nova",
                "R. Dr. Júlio Otaviano Ferreira, 620",
            ),
        ]
    }
}

/// A photo the user picked for upload, fully read into memory.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    /// Original file name, used as the blob name suffix.
    pub name: String,
    /// MIME type reported by the picker (e.g. `image/jpeg`).
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Guess the MIME type from the file extension.
    pub fn content_type_for(name: &str) -> &'static str {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// Short-lived, non-durable reference to a just-picked photo.
///
/// Shown in place of the durable photo while an upload is in flight. Must be
/// handed back to the preview registry once the upload settles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRef(pub String);

impl std::fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
