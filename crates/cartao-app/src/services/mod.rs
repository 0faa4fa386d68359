// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — wires the store, session and export crates together for
// the command-line front end.

pub mod app_services;
pub mod clipboard;
pub mod data_dir;
pub mod identity;
pub mod notifier;
