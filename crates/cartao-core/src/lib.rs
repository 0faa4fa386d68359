// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cartao — Core profile model, normalizers, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod normalize;
pub mod profile;
pub mod types;

pub use config::{AppConfig, QrStyle};
pub use error::{CartaoError, Result};
pub use human_errors::{HumanError, Severity, humanize_error};
pub use profile::{CardLink, CardLinks, LinkKind, Profile};
pub use types::*;
