// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection orchestration — a standard edge-map attempt, then (only if that
// finds nothing) one adaptive-threshold attempt.

use flatscan_core::ScanConfig;
use flatscan_core::types::Quadrilateral;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::raster::bridge::NumericArray;
use crate::scan::candidates::{Polygon, extract_candidates};
use crate::scan::preprocess::{adaptive_binarize, preprocess};
use crate::scan::select::select_quadrilateral;

/// Which binarization a detection attempt ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Attempt {
    /// Median-thresholded Canny edges.
    Standard,
    /// Adaptive local-mean threshold of the blurred grayscale.
    Fallback,
}

/// Verdict of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DetectionResult {
    /// Corners in original-image coordinates, canonically ordered.
    Found(Quadrilateral),
    NotFound,
}

/// Detection verdict plus the attempts that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub result: DetectionResult,
    /// Attempts in the order they ran (one or two entries).
    pub attempts: Vec<Attempt>,
    /// Scale factor between the working image and the original.
    pub ratio: f64,
}

impl Detection {
    /// The detected corners, if any.
    pub fn quadrilateral(&self) -> Option<Quadrilateral> {
        match self.result {
            DetectionResult::Found(quad) => Some(quad),
            DetectionResult::NotFound => None,
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.attempts.contains(&Attempt::Fallback)
    }
}

/// Locate the document outline in `array`.
#[instrument(skip(array, config), fields(width = array.width(), height = array.height()))]
pub fn detect_document(array: &NumericArray, config: &ScanConfig) -> Detection {
    let prepared = preprocess(array, config);
    let band = edge_band_offset(config);

    run_attempts(
        || {
            extract_candidates(&prepared.edges, config)
                .into_iter()
                .map(|polygon| polygon.inset(band))
                .collect()
        },
        || {
            let binary = adaptive_binarize(
                &prepared.blurred,
                config.adaptive_block_radius,
                config.adaptive_offset,
            );
            extract_candidates(&binary, config)
        },
        prepared.ratio,
        config.enable_fallback,
    )
}

/// Distance between the traced outline of the dilated edge map and the
/// intensity step it came from.
///
/// Canny marks the first pixel inside the step, half a pixel from the step
/// itself; dilation then pushes the outer boundary `dilate_radius` pixels
/// further out.
pub fn edge_band_offset(config: &ScanConfig) -> f64 {
    (config.dilate_radius as f64 - 0.5).max(0.0)
}

/// Drive the attempt state machine.
///
/// `standard` and `fallback` produce ranked candidates in working-image
/// coordinates; `fallback` is called at most once and only when `standard`
/// yields no convex quadrilateral. A found quadrilateral is scaled by
/// `ratio` back to original coordinates.
pub fn run_attempts<S, F>(standard: S, fallback: F, ratio: f64, allow_fallback: bool) -> Detection
where
    S: FnOnce() -> Vec<Polygon>,
    F: FnOnce() -> Vec<Polygon>,
{
    enum State {
        Init,
        StandardAttempt,
        FallbackAttempt,
        Found(Quadrilateral),
        NotFound,
    }

    let mut standard = Some(standard);
    let mut fallback = Some(fallback);
    let mut attempts = Vec::with_capacity(2);
    let mut state = State::Init;

    let result = loop {
        state = match state {
            State::Init => State::StandardAttempt,
            State::StandardAttempt => {
                attempts.push(Attempt::Standard);
                let candidates = standard.take().map(|f| f()).unwrap_or_default();
                debug!(candidates = candidates.len(), "Standard attempt scanned");
                match select_quadrilateral(&candidates) {
                    Some(quad) => State::Found(quad),
                    None if allow_fallback => State::FallbackAttempt,
                    None => State::NotFound,
                }
            }
            State::FallbackAttempt => {
                attempts.push(Attempt::Fallback);
                let candidates = fallback.take().map(|f| f()).unwrap_or_default();
                debug!(candidates = candidates.len(), "Fallback attempt scanned");
                match select_quadrilateral(&candidates) {
                    Some(quad) => State::Found(quad),
                    None => State::NotFound,
                }
            }
            State::Found(quad) => break DetectionResult::Found(quad.scale(ratio)),
            State::NotFound => break DetectionResult::NotFound,
        };
    };

    match &result {
        DetectionResult::Found(quad) => info!(
            attempts = attempts.len(),
            top_left = ?quad.top_left,
            bottom_right = ?quad.bottom_right,
            "Document outline found"
        ),
        DetectionResult::NotFound => info!(attempts = attempts.len(), "No document detected"),
    }

    Detection {
        result,
        attempts,
        ratio,
    }
}
