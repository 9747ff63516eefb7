// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polygon geometry not covered by `imageproc::geometry`: strict convexity and
// inward offsetting of convex outlines.

use flatscan_core::types::Point;

/// Whether a polygon turns the same way at every vertex.
///
/// Collinear or repeated vertices make a polygon non-convex here, so a
/// quadrilateral that collapses onto a line is never accepted.
pub fn is_convex(vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut orientation = 0.0f64;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        let turn = cross(a, b, c);
        if turn == 0.0 {
            return false;
        }
        if orientation == 0.0 {
            orientation = turn.signum();
        } else if turn.signum() != orientation {
            return false;
        }
    }
    true
}

/// Z component of `(b - a) x (c - b)`.
pub fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

/// Shift every edge of a convex polygon inward by `distance`.
///
/// Each vertex moves along the bisector of its corner by
/// `distance / sin(angle / 2)`. Vertices with a zero-length neighbouring
/// edge stay where they are.
pub fn inset_convex(vertices: &[Point], distance: f64) -> Vec<Point> {
    let n = vertices.len();
    if n < 3 || distance == 0.0 {
        return vertices.to_vec();
    }

    (0..n)
        .map(|i| {
            let p = vertices[i];
            let (Some(u), Some(v)) = (
                unit_towards(p, vertices[(i + n - 1) % n]),
                unit_towards(p, vertices[(i + 1) % n]),
            ) else {
                return p;
            };

            let (bx, by) = (u.x + v.x, u.y + v.y);
            let length = bx.hypot(by);
            // |u + v| = 2 cos(angle / 2)
            let sin_half = (1.0 - (length / 2.0).powi(2)).max(0.0).sqrt();
            if length < 1e-9 || sin_half < 1e-9 {
                return p;
            }

            let shift = distance / sin_half;
            Point::new(p.x + bx / length * shift, p.y + by / length * shift)
        })
        .collect()
}

fn unit_towards(from: Point, to: Point) -> Option<Point> {
    let length = from.distance(&to);
    (length > 0.0).then(|| Point::new((to.x - from.x) / length, (to.y - from.y) / length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance(&b) < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn convexity() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(is_convex(&square));

        let dart = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 10.0),
            Point::new(3.0, 5.0),
        ];
        assert!(!is_convex(&dart));

        let collapsed = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(!is_convex(&collapsed));
    }

    #[test]
    fn inset_square_moves_corners_diagonally() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let inset = inset_convex(&square, 1.0);
        assert_close(inset[0], Point::new(1.0, 1.0));
        assert_close(inset[1], Point::new(9.0, 1.0));
        assert_close(inset[2], Point::new(9.0, 9.0));
        assert_close(inset[3], Point::new(1.0, 9.0));
    }

    #[test]
    fn inset_keeps_edges_parallel() {
        // Right-angled triangle: the hypotenuse moves by exactly `distance`.
        let triangle = [
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(0.0, 30.0),
        ];
        let inset = inset_convex(&triangle, 2.0);
        assert_close(inset[0], Point::new(2.0, 2.0));
        // Distance from the new hypotenuse to the old one along the normal.
        let shift = (30.0 - inset[1].x - inset[1].y) / 2.0f64.sqrt();
        assert!((shift - 2.0).abs() < 1e-9);
        assert!((inset[1].y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_inset_is_identity() {
        let quad = [
            Point::new(3.0, 1.0),
            Point::new(9.0, 2.0),
            Point::new(8.0, 7.0),
            Point::new(1.0, 6.0),
        ];
        assert_eq!(inset_convex(&quad, 0.0), quad.to_vec());
    }
}
