// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cartao-store — Local persistence adapters: profile documents in SQLite and
// avatar blobs in a directory tree.

pub mod blobs;
pub mod profiles;

pub use blobs::FsBlobStore;
pub use profiles::{ProfileDb, SqliteProfileStore};
