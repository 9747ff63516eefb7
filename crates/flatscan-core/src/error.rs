// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Flatscan.

use thiserror::Error;

/// Top-level error type for all Flatscan operations.
///
/// "No document detected" is not an error; the scan pipeline reports it
/// through its result types.
#[derive(Debug, Error)]
pub enum FlatscanError {
    // -- Input errors --
    #[error("invalid image: {0}")]
    InvalidImage(String),

    // -- Geometry errors --
    #[error("degenerate quadrilateral: {0}")]
    DegenerateQuadrilateral(String),

    // -- Host-side image codec errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FlatscanError>;
