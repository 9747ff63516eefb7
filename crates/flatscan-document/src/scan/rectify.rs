// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — warp the quadrilateral spanned by four corners
// onto an upright rectangle sized from the measured edge lengths.

use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::types::Quadrilateral;
use image::{ImageBuffer, Luma, Pixel, Rgb};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument};

use crate::raster::bridge::NumericArray;
use crate::scan::geometry::cross;

/// Output size for a quadrilateral: the longer of each pair of opposite
/// edges, truncated to whole pixels.
pub fn target_size(quad: &Quadrilateral) -> (u32, u32) {
    let width_bottom = quad.bottom_right.distance(&quad.bottom_left) as u32;
    let width_top = quad.top_right.distance(&quad.top_left) as u32;
    let height_right = quad.top_right.distance(&quad.bottom_right) as u32;
    let height_left = quad.top_left.distance(&quad.bottom_left) as u32;
    (width_bottom.max(width_top), height_right.max(height_left))
}

/// Warp `original` so that `quad` fills a `W x H` upright rectangle.
///
/// The corners are re-ordered canonically first. Fails with
/// `DegenerateQuadrilateral` when the target has no area, when three corners
/// are collinear, or when no unique homography exists.
#[instrument(skip(original), fields(width = original.width(), height = original.height()))]
pub fn rectify(original: &NumericArray, quad: &Quadrilateral) -> Result<NumericArray> {
    let quad = quad.reordered();
    let (out_w, out_h) = target_size(&quad);
    debug!(out_w, out_h, "Target rectangle measured");

    if out_w == 0 || out_h == 0 {
        return Err(FlatscanError::DegenerateQuadrilateral(format!(
            "target size {}x{} has no area",
            out_w, out_h
        )));
    }
    if has_collinear_corners(&quad) {
        return Err(FlatscanError::DegenerateQuadrilateral(
            "three corners are collinear".into(),
        ));
    }

    let projection = corner_projection(&quad, out_w, out_h)?;

    let rectified = match original {
        NumericArray::Gray(img) => {
            NumericArray::Gray(warp(img, &projection, Luma([0u8]), out_w, out_h))
        }
        NumericArray::Rgb(img) => {
            NumericArray::Rgb(warp(img, &projection, Rgb([0u8, 0, 0]), out_w, out_h))
        }
    };

    info!(out_w, out_h, "Perspective rectification applied");
    Ok(rectified)
}

/// Projection taking the canonical corners of `quad` onto the corners of a
/// `out_w x out_h` image, `(0, 0)` to `(out_w - 1, out_h - 1)`.
fn corner_projection(quad: &Quadrilateral, out_w: u32, out_h: u32) -> Result<Projection> {
    let (w, h) = ((out_w - 1) as f32, (out_h - 1) as f32);
    let dest: [(f32, f32); 4] = [
        (0.0, 0.0), // top-left
        (w, 0.0),   // top-right
        (w, h),     // bottom-right
        (0.0, h),   // bottom-left
    ];
    let src = quad.corners().map(|p| (p.x as f32, p.y as f32));

    // from_control_points computes the mapping from `src` to `dest`.
    Projection::from_control_points(src, dest).ok_or_else(|| {
        FlatscanError::DegenerateQuadrilateral("no projective transform fits the corners".into())
    })
}

fn warp<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    projection: &Projection,
    default: P,
    out_w: u32,
    out_h: u32,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + Send + Sync,
{
    let mut output = ImageBuffer::from_pixel(out_w, out_h, default);
    warp_into(image, projection, Interpolation::Bilinear, default, &mut output);
    output
}

/// Whether any three of the four corners lie on one line (including
/// coincident corners).
fn has_collinear_corners(quad: &Quadrilateral) -> bool {
    let c = quad.corners();
    let triples = [(0, 1, 2), (1, 2, 3), (2, 3, 0), (3, 0, 1)];
    triples.iter().any(|&(i, j, k)| {
        let span = c[i].distance(&c[j]) * c[j].distance(&c[k]);
        span == 0.0 || cross(c[i], c[j], c[k]).abs() <= span * 1e-9
    })
}
