// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cartao-session — One owner editing one card: the session lifecycle, the
// profile editor with its save and share actions, the photo upload state
// machine, and the read-only public card view.

pub mod card;
pub mod context;
pub mod editor;
pub mod upload;

pub use card::PublicCard;
pub use context::SessionContext;
pub use editor::{ProfileEditor, ShareOutcome, SharedProfile};
pub use upload::{UploadCoordinator, UploadOutcome, UploadState};
