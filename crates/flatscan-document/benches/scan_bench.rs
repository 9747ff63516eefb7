// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the flatscan-document crate: full detection plus
// rectification on synthetic pages, and the no-document path that runs both
// attempts.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use flatscan_core::types::{PixelFormat, RasterImage};
use flatscan_document::DocumentScanner;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Dark RGB background with a light rectangle covering `[x0, x1) x [y0, y1)`.
fn page(width: u32, height: u32, (x0, y0, x1, y1): (u32, u32, u32, u32)) -> RasterImage {
    let mut data = vec![30u8; (width * height * 3) as usize];
    for y in y0..y1 {
        for x in x0..x1 {
            let i = ((y * width + x) * 3) as usize;
            data[i..i + 3].copy_from_slice(&[240, 236, 228]);
        }
    }
    RasterImage::packed(width, height, PixelFormat::Rgb24, data)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A 400x300 page: below the working height, so no downscale.
fn bench_detect_and_rectify_small(c: &mut Criterion) {
    let scanner = DocumentScanner::default();
    let image = page(400, 300, (50, 50, 350, 250));

    c.bench_function("detect_and_rectify (400x300)", |b| {
        b.iter(|| black_box(scanner.detect_and_rectify(black_box(&image))));
    });
}

/// A 1200x1600 page: detection runs on an 800-row working copy and the warp
/// samples the full-resolution image.
fn bench_detect_and_rectify_camera(c: &mut Criterion) {
    let scanner = DocumentScanner::default();
    let image = page(1200, 1600, (150, 200, 1050, 1400));

    c.bench_function("detect_and_rectify (1200x1600)", |b| {
        b.iter(|| black_box(scanner.detect_and_rectify(black_box(&image))));
    });
}

/// A featureless frame: the standard attempt fails and the fallback runs.
fn bench_blank_frame(c: &mut Criterion) {
    let scanner = DocumentScanner::default();
    let image = RasterImage::packed(640, 480, PixelFormat::Rgb24, vec![128; 640 * 480 * 3]);

    c.bench_function("detect (blank 640x480)", |b| {
        b.iter(|| black_box(scanner.detect(black_box(&image))));
    });
}

criterion_group!(
    benches,
    bench_detect_and_rectify_small,
    bench_detect_and_rectify_camera,
    bench_blank_frame
);
criterion_main!(benches);
