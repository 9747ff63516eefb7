// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Flatscan.

use serde::{Deserialize, Serialize};

use crate::error::{FlatscanError, Result};

/// Pixel layout of a host-side raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// One luma byte per pixel.
    Gray8,
    /// Packed red, green, blue.
    Rgb24,
    /// Packed blue, green, red (common for camera and OS buffers).
    Bgr24,
    /// Packed red, green, blue, alpha.
    Rgba32,
    /// Packed blue, green, red, alpha.
    Bgra32,
    /// Palette indices; the palette is not carried, so these cannot be read.
    Indexed8,
    /// One bit per pixel, packed.
    Mono1,
}

impl PixelFormat {
    /// Bytes per pixel, or `None` for formats the scan pipeline cannot read.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            Self::Gray8 => Some(1),
            Self::Rgb24 | Self::Bgr24 => Some(3),
            Self::Rgba32 | Self::Bgra32 => Some(4),
            Self::Indexed8 | Self::Mono1 => None,
        }
    }

    /// Whether the scan pipeline accepts this format.
    pub fn is_supported(&self) -> bool {
        self.bytes_per_pixel().is_some()
    }
}

/// A host-native image buffer: dimensions, pixel format, row stride, bytes.
///
/// Rows may be padded (`stride > width * bytes_per_pixel`), as with most
/// toolkit image types. Every conversion into or out of the scan pipeline
/// copies, so a `RasterImage` is never aliased by pipeline state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Bytes per row, including padding.
    pub stride: usize,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Wrap a tightly packed buffer (`stride = width * bytes_per_pixel`).
    ///
    /// Unsupported formats get a stride of `width`; they are rejected later by
    /// [`RasterImage::validate`].
    pub fn packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        let stride = width as usize * format.bytes_per_pixel().unwrap_or(1);
        Self {
            width,
            height,
            format,
            stride,
            data,
        }
    }

    /// Check that the buffer can be read as described.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FlatscanError::InvalidImage(format!(
                "image has zero extent ({}x{})",
                self.width, self.height
            )));
        }
        let bpp = self.format.bytes_per_pixel().ok_or_else(|| {
            FlatscanError::InvalidImage(format!("unsupported pixel format {:?}", self.format))
        })?;
        let row_bytes = self.width as usize * bpp;
        if self.stride < row_bytes {
            return Err(FlatscanError::InvalidImage(format!(
                "stride {} is shorter than a row of {} bytes",
                self.stride, row_bytes
            )));
        }
        // The last row only needs its pixel bytes, not its padding.
        let required = self.stride * (self.height as usize - 1) + row_bytes;
        if self.data.len() < required {
            return Err(FlatscanError::InvalidImage(format!(
                "buffer holds {} bytes, {} required",
                self.data.len(),
                required
            )));
        }
        Ok(())
    }
}

/// A 2D point in image coordinates (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Multiply both coordinates by `factor`.
    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

/// Four document corners in canonical order.
///
/// The ordering rule: the smallest `x + y` is top-left, the largest is
/// bottom-right, the smallest `y - x` is top-right, the largest is
/// bottom-left. Ties go to the earliest input point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quadrilateral {
    /// Assign roles to four points given in any order.
    pub fn from_unordered(points: [Point; 4]) -> Self {
        let sum = |p: &Point| p.x + p.y;
        let diff = |p: &Point| p.y - p.x;
        Self {
            top_left: points[argmin(&points, sum)],
            top_right: points[argmin(&points, diff)],
            bottom_right: points[argmax(&points, sum)],
            bottom_left: points[argmax(&points, diff)],
        }
    }

    /// Corners as `[top_left, top_right, bottom_right, bottom_left]`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Re-apply the canonical ordering to these corners.
    pub fn reordered(&self) -> Self {
        Self::from_unordered(self.corners())
    }

    /// Scale every corner by the same factor (e.g. back to original
    /// resolution after a downscale).
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            top_left: self.top_left.scale(factor),
            top_right: self.top_right.scale(factor),
            bottom_right: self.bottom_right.scale(factor),
            bottom_left: self.bottom_left.scale(factor),
        }
    }
}

/// Why a scan produced no rectified image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotFoundReason {
    /// Neither detection attempt found a convex four-sided outline.
    NoQuadrilateral,
    /// An outline was found but its corners do not span a usable area.
    Degenerate,
}

// First index wins on ties, matching numpy-style argmin/argmax.
fn argmin(points: &[Point; 4], key: impl Fn(&Point) -> f64) -> usize {
    let mut best = 0;
    for i in 1..4 {
        if key(&points[i]) < key(&points[best]) {
            best = i;
        }
    }
    best
}

fn argmax(points: &[Point; 4], key: impl Fn(&Point) -> f64) -> usize {
    let mut best = 0;
    for i in 1..4 {
        if key(&points[i]) > key(&points[best]) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_points() -> [Point; 4] {
        [
            Point::new(50.0, 50.0),
            Point::new(350.0, 50.0),
            Point::new(350.0, 250.0),
            Point::new(50.0, 250.0),
        ]
    }

    #[test]
    fn canonical_order_is_independent_of_input_order() {
        let p = rect_points();
        let expected = Quadrilateral::from_unordered(p);
        let permutations = [
            [p[2], p[0], p[3], p[1]],
            [p[3], p[2], p[1], p[0]],
            [p[1], p[3], p[0], p[2]],
        ];
        for perm in permutations {
            assert_eq!(Quadrilateral::from_unordered(perm), expected);
        }
        assert_eq!(expected.top_left, Point::new(50.0, 50.0));
        assert_eq!(expected.top_right, Point::new(350.0, 50.0));
        assert_eq!(expected.bottom_right, Point::new(350.0, 250.0));
        assert_eq!(expected.bottom_left, Point::new(50.0, 250.0));
    }

    #[test]
    fn tilted_quad_orders_by_sum_and_difference() {
        let quad = Quadrilateral::from_unordered([
            Point::new(120.0, 400.0),
            Point::new(60.0, 80.0),
            Point::new(420.0, 430.0),
            Point::new(380.0, 40.0),
        ]);
        assert_eq!(quad.top_left, Point::new(60.0, 80.0));
        assert_eq!(quad.top_right, Point::new(380.0, 40.0));
        assert_eq!(quad.bottom_right, Point::new(420.0, 430.0));
        assert_eq!(quad.bottom_left, Point::new(120.0, 400.0));
    }

    #[test]
    fn scale_is_uniform() {
        let quad = Quadrilateral::from_unordered(rect_points()).scale(2.5);
        assert_eq!(quad.top_left, Point::new(125.0, 125.0));
        assert_eq!(quad.bottom_right, Point::new(875.0, 625.0));
    }

    #[test]
    fn zero_extent_is_invalid() {
        let img = RasterImage::packed(0, 10, PixelFormat::Rgb24, Vec::new());
        assert!(matches!(img.validate(), Err(FlatscanError::InvalidImage(_))));
    }

    #[test]
    fn unsupported_format_is_invalid() {
        let img = RasterImage::packed(4, 4, PixelFormat::Indexed8, vec![0; 16]);
        assert!(matches!(img.validate(), Err(FlatscanError::InvalidImage(_))));
    }

    #[test]
    fn short_buffer_is_invalid() {
        let img = RasterImage::packed(4, 4, PixelFormat::Rgb24, vec![0; 47]);
        assert!(matches!(img.validate(), Err(FlatscanError::InvalidImage(_))));
    }

    #[test]
    fn padded_rows_validate() {
        // 3 pixels * 3 bytes = 9, padded to 12; last row unpadded.
        let img = RasterImage {
            width: 3,
            height: 2,
            format: PixelFormat::Rgb24,
            stride: 12,
            data: vec![0; 21],
        };
        img.validate().unwrap();
    }
}
