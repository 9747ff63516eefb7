// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection over ranked candidates.

use flatscan_core::types::Quadrilateral;

use crate::scan::candidates::Polygon;

/// Pick the first convex four-vertex candidate, in the order given.
///
/// Candidates arrive largest-area first, so the largest convex quadrilateral
/// wins even when a smaller one fits the page better. Corners come back in
/// canonical order.
pub fn select_quadrilateral(candidates: &[Polygon]) -> Option<Quadrilateral> {
    candidates
        .iter()
        .find(|c| c.is_convex_quadrilateral())
        .map(|c| {
            Quadrilateral::from_unordered([
                c.vertices[0],
                c.vertices[1],
                c.vertices[2],
                c.vertices[3],
            ])
        })
}
