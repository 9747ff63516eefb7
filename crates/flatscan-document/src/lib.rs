// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan-document — Document boundary detection and perspective
// rectification.
//
// Provides the pixel buffer bridge between host rasters and numeric arrays,
// and the scan pipeline (edge map, contour candidates, quadrilateral
// selection, standard/fallback orchestration, homography warp).

pub mod raster;
pub mod scan;

// Re-export the primary entry points so callers can use
// `flatscan_document::DocumentScanner` etc.
pub use raster::bridge::{NumericArray, from_numeric_array, to_numeric_array};
pub use scan::detect::{Attempt, Detection, DetectionResult};
pub use scan::scanner::{DocumentScanner, Rectification, detect_and_rectify};
