// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — conversion between host pixel buffers and the numeric
// arrays the scan pipeline works on.

pub mod bridge;

pub use bridge::NumericArray;
