// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Cartao.

use thiserror::Error;

/// Top-level error type for all Cartao operations.
#[derive(Debug, Error)]
pub enum CartaoError {
    // -- Session / identity --
    #[error("no signed-in user")]
    NotSignedIn,

    #[error("identity provider error: {0}")]
    Identity(String),

    // -- Document store --
    #[error("profile read failed: {0}")]
    DocumentRead(String),

    #[error("profile write failed: {0}")]
    DocumentWrite(String),

    #[error("stored profile was never loaded; refusing to overwrite it")]
    ProfileNotLoaded,

    // -- Photo upload --
    #[error("photo is {size} bytes, limit is {limit} bytes")]
    PhotoTooLarge { size: u64, limit: u64 },

    #[error("a photo upload is already in progress")]
    UploadInProgress,

    #[error("photo upload failed: {0}")]
    BlobUpload(String),

    #[error("invalid blob path: {0}")]
    InvalidBlobPath(String),

    // -- Export --
    #[error("QR encoding failed: {0}")]
    QrEncode(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CartaoError>;
