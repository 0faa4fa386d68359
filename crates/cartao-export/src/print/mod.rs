// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print module — page geometry derived from the rendered card.

pub mod layout;

pub use layout::{PageGeometry, PrintLayoutCalculator, RasterMeasure, px_to_mm};
