// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — edge map preprocessing, contour candidates,
// quadrilateral selection, detection orchestration, and perspective
// rectification.

pub mod candidates;
pub mod detect;
pub mod geometry;
pub mod preprocess;
pub mod rectify;
pub mod scanner;
pub mod select;

pub use detect::{Attempt, Detection, DetectionResult};
pub use scanner::{DocumentScanner, Rectification};
