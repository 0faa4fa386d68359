// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cartao-bridge — Interfaces to the collaborators the export pipeline talks
// to but does not implement: identity, document and blob storage, the
// rendering layer's measurement hook, notices, and the platform share and
// clipboard surfaces.
//
// Concrete adapters live elsewhere (`cartao-store` for persistence); the
// `memory` module provides in-process implementations for tests and for
// builds without platform services.

pub mod memory;
pub mod traits;

pub use traits::*;
