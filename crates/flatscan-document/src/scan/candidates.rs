// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour candidate extraction — outermost boundaries of a binary map,
// ranked by area, filtered, and simplified to polygons.

use flatscan_core::ScanConfig;
use flatscan_core::types::Point;
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point as Pixel;
use tracing::{debug, instrument};

use crate::scan::geometry::{inset_convex, is_convex};

/// A simplified contour, in the coordinates of the map it was traced in.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
    /// Area enclosed by the traced contour (not the simplified polygon).
    pub area: f64,
}

impl Polygon {
    /// Four vertices and a consistent turning direction.
    pub fn is_convex_quadrilateral(&self) -> bool {
        self.vertices.len() == 4 && is_convex(&self.vertices)
    }

    /// Pull a convex outline inward by `distance`; other polygons are
    /// returned unchanged.
    pub fn inset(self, distance: f64) -> Self {
        if distance <= 0.0 || !is_convex(&self.vertices) {
            return self;
        }
        Self {
            vertices: inset_convex(&self.vertices, distance),
            area: self.area,
        }
    }
}

/// Extract candidate polygons from a binary map, largest first.
///
/// Only outermost boundaries are traced (holes and anything nested inside
/// another outline are ignored). At most `max_candidates` contours are
/// considered; those enclosing less than `min_area_fraction` of the map are
/// dropped, and the rest are simplified with a tolerance of
/// `approx_epsilon_fraction` times their perimeter.
#[instrument(skip(binary, config), fields(width = binary.width(), height = binary.height()))]
pub fn extract_candidates(binary: &GrayImage, config: &ScanConfig) -> Vec<Polygon> {
    let frame_area = binary.width() as f64 * binary.height() as f64;
    let min_area = frame_area * config.min_area_fraction;

    let mut outlines: Vec<(f64, Vec<Pixel<i32>>)> = find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| (contour_area(&c.points), c.points))
        .collect();
    let traced = outlines.len();

    // Stable sort: equal areas keep tracing order.
    outlines.sort_by(|a, b| b.0.total_cmp(&a.0));
    outlines.truncate(config.max_candidates);

    let candidates: Vec<Polygon> = outlines
        .into_iter()
        .filter(|(area, _)| *area >= min_area)
        .map(|(area, points)| Polygon {
            vertices: simplify(&points, config.approx_epsilon_fraction)
                .into_iter()
                .map(|p| Point::new(p.x as f64, p.y as f64))
                .collect(),
            area,
        })
        .collect();

    debug!(
        traced,
        candidates = candidates.len(),
        min_area,
        "Contour candidates extracted"
    );
    candidates
}

/// Closed-curve Douglas-Peucker with a tolerance proportional to the
/// perimeter. Curves too short to simplify are kept as traced.
fn simplify(points: &[Pixel<i32>], epsilon_fraction: f64) -> Vec<Pixel<i32>> {
    let epsilon = epsilon_fraction * arc_length(points, true);
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }
    approximate_polygon_dp(points, epsilon, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, value: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn empty_map_has_no_candidates() {
        let map = GrayImage::new(100, 100);
        assert!(extract_candidates(&map, &ScanConfig::default()).is_empty());
    }

    #[test]
    fn candidates_are_sorted_by_area() {
        let mut map = GrayImage::new(200, 200);
        fill(&mut map, 10, 10, 60, 60, 255);
        fill(&mut map, 80, 80, 190, 190, 255);
        let candidates = extract_candidates(&map, &ScanConfig::default());
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].area > candidates[1].area);
        assert!(candidates.iter().all(|c| c.is_convex_quadrilateral()));
    }

    #[test]
    fn small_contours_are_filtered() {
        let mut map = GrayImage::new(200, 200);
        // 10x10 blob: well under 5% of 40000.
        fill(&mut map, 20, 20, 30, 30, 255);
        fill(&mut map, 50, 50, 150, 150, 255);
        let config = ScanConfig::default();
        let candidates = extract_candidates(&map, &config);
        assert_eq!(candidates.len(), 1);
        let min_area = 200.0 * 200.0 * config.min_area_fraction;
        assert!(candidates.iter().all(|c| c.area >= min_area));
    }

    #[test]
    fn nested_outlines_are_ignored() {
        // A thick square ring with a filled square inside its hole.
        let mut map = GrayImage::new(200, 200);
        fill(&mut map, 10, 10, 190, 190, 255);
        fill(&mut map, 30, 30, 170, 170, 0);
        fill(&mut map, 50, 50, 150, 150, 255);
        let candidates = extract_candidates(&map, &ScanConfig::default());
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].area > 170.0 * 170.0);
    }

    #[test]
    fn filled_rectangle_simplifies_to_its_corners() {
        let mut map = GrayImage::new(160, 120);
        fill(&mut map, 10, 20, 111, 81, 255);
        let candidates = extract_candidates(&map, &ScanConfig::default());
        assert_eq!(candidates.len(), 1);
        let mut corners: Vec<(f64, f64)> =
            candidates[0].vertices.iter().map(|p| (p.x, p.y)).collect();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            corners,
            vec![(10.0, 20.0), (10.0, 80.0), (110.0, 20.0), (110.0, 80.0)]
        );
    }

    #[test]
    fn inset_moves_convex_outline_inward() {
        let polygon = Polygon {
            vertices: vec![
                Point::new(9.0, 9.0),
                Point::new(30.0, 9.0),
                Point::new(30.0, 20.0),
                Point::new(9.0, 20.0),
            ],
            area: 231.0,
        };
        let inset = polygon.inset(1.0);
        assert!(inset.vertices[0].distance(&Point::new(10.0, 10.0)) < 1e-9);
        assert!(inset.vertices[2].distance(&Point::new(29.0, 19.0)) < 1e-9);
    }

    #[test]
    fn inset_leaves_non_convex_outline_alone() {
        let dart = Polygon {
            vertices: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 5.0),
                Point::new(0.0, 10.0),
                Point::new(3.0, 5.0),
            ],
            area: 35.0,
        };
        assert_eq!(dart.clone().inset(1.0), dart);
    }

    #[test]
    fn candidate_cap_is_respected() {
        let mut map = GrayImage::new(300, 300);
        for i in 0..3 {
            let x = 10 + i * 95;
            fill(&mut map, x, 10, x + 85, 290, 255);
        }
        let config = ScanConfig {
            max_candidates: 2,
            ..ScanConfig::default()
        };
        assert_eq!(extract_candidates(&map, &config).len(), 2);
    }
}
