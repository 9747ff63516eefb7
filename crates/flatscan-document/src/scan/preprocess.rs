// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge map preprocessing — downscale, grayscale, blur, median-derived Canny
// thresholds and dilation, plus the adaptive-threshold binarization used by
// the fallback attempt.

use flatscan_core::ScanConfig;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::integral_image::{integral_image, sum_image_pixels};
use imageproc::morphology::dilate;
use tracing::{debug, instrument};

use crate::raster::bridge::NumericArray;

/// Output of the preprocessing pipeline.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Binary (0/255) edge map at working resolution.
    pub edges: GrayImage,
    /// Blurred grayscale at working resolution, kept for the fallback
    /// binarization.
    pub blurred: GrayImage,
    /// Original height divided by working height (1.0 when not downscaled).
    pub ratio: f64,
}

/// Run the preprocessing pipeline on a colour or luma array.
///
/// ## Pipeline
///
/// 1. Downscale so the height is at most `max_working_height` (bilinear)
/// 2. Convert to grayscale
/// 3. Gaussian blur
/// 4. Canny with thresholds at `(1 ± canny_sigma) * median`
/// 5. Dilate once with a square structuring element
#[instrument(skip(array, config), fields(width = array.width(), height = array.height()))]
pub fn preprocess(array: &NumericArray, config: &ScanConfig) -> Preprocessed {
    let (working, ratio) = downscale(array, config.max_working_height);
    let gray = working.to_gray();
    debug!(
        ratio,
        width = gray.width(),
        height = gray.height(),
        "Working image prepared"
    );

    let blurred = gaussian_blur_f32(&gray, config.blur_sigma);

    let median = median_intensity(&blurred);
    let (lower, upper) = canny_thresholds(median, config.canny_sigma);
    let edges = canny(&blurred, lower, upper);
    debug!(median, lower, upper, "Canny edge detection complete");

    let edges = dilate(&edges, Norm::LInf, config.dilate_radius);

    Preprocessed {
        edges,
        blurred,
        ratio,
    }
}

/// Shrink the array so its height is at most `max_height`, returning the
/// working array and the scale ratio (original / working).
pub fn downscale(array: &NumericArray, max_height: u32) -> (NumericArray, f64) {
    let (width, height) = (array.width(), array.height());
    if height <= max_height {
        return (array.clone(), 1.0);
    }

    let ratio = height as f64 / max_height as f64;
    let new_width = ((width as f64 / ratio) as u32).max(1);
    let new_height = max_height;

    let resized = match array {
        NumericArray::Gray(img) => {
            NumericArray::Gray(imageops::resize(img, new_width, new_height, FilterType::Triangle))
        }
        NumericArray::Rgb(img) => {
            NumericArray::Rgb(imageops::resize(img, new_width, new_height, FilterType::Triangle))
        }
    };
    (resized, ratio)
}

/// Median sample value. For an even sample count this is the mean of the two
/// middle values.
pub fn median_intensity(gray: &GrayImage) -> f64 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }

    // 0-based ranks of the two middle samples (equal when `total` is odd).
    let low_rank = (total - 1) / 2;
    let high_rank = total / 2;
    let value_at = |rank: u64| -> f64 {
        let mut seen = 0u64;
        for (value, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen > rank {
                return value as f64;
            }
        }
        255.0
    };

    (value_at(low_rank) + value_at(high_rank)) / 2.0
}

/// Canny hysteresis thresholds around the median.
///
/// Both are truncated to whole intensities and floored at 1: imageproc keeps
/// gradients `>=` the high threshold, so a zero threshold would turn flat
/// regions into edges.
pub fn canny_thresholds(median: f64, sigma: f32) -> (f32, f32) {
    let sigma = sigma as f64;
    let lower = ((1.0 - sigma) * median).clamp(0.0, 255.0).trunc();
    let upper = ((1.0 + sigma) * median).clamp(0.0, 255.0).trunc();
    (lower.max(1.0) as f32, upper.max(1.0) as f32)
}

// -- Adaptive binarization ----------------------------------------------------

/// Local-mean adaptive threshold with the foreground inverted.
///
/// For each pixel the threshold is the mean of the `(2r+1)^2` window around
/// it minus `offset`. Pixels at or below the threshold (darker than their
/// surroundings) become 255; everything else becomes 0. Uniform regions
/// therefore come out empty and the map only lights up along intensity
/// transitions.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn adaptive_binarize(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let integral = integral_image::<_, u64>(gray);

    let output = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let threshold = window_mean(&integral, x, y, block_radius) - offset as f64;
        let value = gray.get_pixel(x, y).0[0] as f64;
        Luma([if value <= threshold { 255u8 } else { 0u8 }])
    });

    debug!(block_radius, offset, "Adaptive binarization complete");
    output
}

/// Mean over the square window centred on `(cx, cy)`, clipped to the image.
///
/// `integral` is one pixel wider and taller than the image it sums.
fn window_mean(
    integral: &ImageBuffer<Luma<u64>, Vec<u64>>,
    cx: u32,
    cy: u32,
    radius: u32,
) -> f64 {
    let (last_x, last_y) = (integral.width() - 2, integral.height() - 2);
    let (left, top) = (cx.saturating_sub(radius), cy.saturating_sub(radius));
    let (right, bottom) = ((cx + radius).min(last_x), (cy + radius).min(last_y));

    let sum = sum_image_pixels(integral, left, top, right, bottom)[0];
    let count = (right - left + 1) as u64 * (bottom - top + 1) as u64;
    sum as f64 / count as f64
}
