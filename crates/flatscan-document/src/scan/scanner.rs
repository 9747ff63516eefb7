// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner — the collaborator-facing entry points: detect a page in
// a host raster, rectify it, or rectify caller-chosen corners.

use flatscan_core::ScanConfig;
use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::types::{NotFoundReason, Point, Quadrilateral, RasterImage};
use tracing::{info, instrument, warn};

use crate::raster::bridge::{NumericArray, from_numeric_array, to_numeric_array};
use crate::scan::detect::{Detection, detect_document};
use crate::scan::rectify::rectify;

/// Outcome of [`DocumentScanner::detect_and_rectify`].
#[derive(Debug, Clone, PartialEq)]
pub enum Rectification {
    /// The page, warped flat. The caller owns it.
    Rectified(RasterImage),
    /// No usable page outline; the caller should keep the original image.
    NotFound(NotFoundReason),
}

impl Rectification {
    /// The rectified image, if there is one.
    pub fn into_image(self) -> Option<RasterImage> {
        match self {
            Self::Rectified(image) => Some(image),
            Self::NotFound(_) => None,
        }
    }
}

/// Detects and flattens photographed documents.
///
/// Holds only configuration; every call allocates its own working buffers,
/// so one scanner can be shared across threads.
///
/// ```ignore
/// let scanner = DocumentScanner::default();
/// match scanner.detect_and_rectify(&raster)? {
///     Rectification::Rectified(page) => show(page),
///     Rectification::NotFound(reason) => notify(humanize_not_found(reason)),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    config: ScanConfig,
}

impl DocumentScanner {
    // -- Construction ---------------------------------------------------------

    /// Create a scanner with a custom configuration.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // -- Detection ------------------------------------------------------------

    /// Find the document corners without warping.
    ///
    /// Corners are in the coordinates of `image`; useful for drawing an
    /// overlay or seeding a manual crop editor.
    #[instrument(skip_all, fields(width = image.width, height = image.height))]
    pub fn detect(&self, image: &RasterImage) -> Result<Detection> {
        let array = to_numeric_array(image)?;
        Ok(detect_document(&array, &self.config))
    }

    // -- Rectification --------------------------------------------------------

    /// Detect the document and return it flattened.
    ///
    /// Fails only for unreadable input (`InvalidImage`), before any detection
    /// work runs. A missing or degenerate outline is reported as
    /// [`Rectification::NotFound`].
    #[instrument(skip_all, fields(width = image.width, height = image.height))]
    pub fn detect_and_rectify(&self, image: &RasterImage) -> Result<Rectification> {
        let array = to_numeric_array(image)?;
        let detection = detect_document(&array, &self.config);
        finish(&array, &detection)
    }

    /// Rectify `image` using an earlier detection of the same image.
    pub fn rectify_detection(
        &self,
        image: &RasterImage,
        detection: &Detection,
    ) -> Result<Rectification> {
        let array = to_numeric_array(image)?;
        finish(&array, detection)
    }

    /// Rectify the region spanned by caller-chosen corners, in any order.
    ///
    /// Unlike detection, bad corners are an error here: the caller picked
    /// them and can move them. Every corner must lie on the image, in
    /// `[0, width - 1] x [0, height - 1]`; otherwise the call fails with
    /// `DegenerateQuadrilateral` before anything is allocated.
    #[instrument(skip(self, image), fields(width = image.width, height = image.height))]
    pub fn rectify_with_corners(
        &self,
        image: &RasterImage,
        corners: [Point; 4],
    ) -> Result<RasterImage> {
        let array = to_numeric_array(image)?;
        check_corners_on_image(&corners, image.width, image.height)?;
        let quad = Quadrilateral::from_unordered(corners);
        let rectified = rectify(&array, &quad)?;
        Ok(from_numeric_array(&rectified))
    }
}

/// Detect and rectify with the default configuration.
pub fn detect_and_rectify(image: &RasterImage) -> Result<Rectification> {
    DocumentScanner::default().detect_and_rectify(image)
}

fn check_corners_on_image(corners: &[Point; 4], width: u32, height: u32) -> Result<()> {
    let (max_x, max_y) = ((width - 1) as f64, (height - 1) as f64);
    match corners
        .iter()
        .find(|p| !((0.0..=max_x).contains(&p.x) && (0.0..=max_y).contains(&p.y)))
    {
        Some(p) => Err(FlatscanError::DegenerateQuadrilateral(format!(
            "corner ({}, {}) lies outside the {}x{} image",
            p.x, p.y, width, height
        ))),
        None => Ok(()),
    }
}

fn finish(array: &NumericArray, detection: &Detection) -> Result<Rectification> {
    let Some(quad) = detection.quadrilateral() else {
        return Ok(Rectification::NotFound(NotFoundReason::NoQuadrilateral));
    };

    match rectify(array, &quad) {
        Ok(rectified) => {
            let page = from_numeric_array(&rectified);
            info!(width = page.width, height = page.height, "Document rectified");
            Ok(Rectification::Rectified(page))
        }
        Err(FlatscanError::DegenerateQuadrilateral(detail)) => {
            warn!(
                %detail,
                top_left = ?quad.top_left,
                bottom_right = ?quad.bottom_right,
                "Detected outline is degenerate; reporting no document"
            );
            Ok(Rectification::NotFound(NotFoundReason::Degenerate))
        }
        Err(err) => Err(err),
    }
}
