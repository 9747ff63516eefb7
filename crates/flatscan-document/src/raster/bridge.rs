// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer bridge — copies host rasters (any supported pixel format, any
// row stride) into dense row-major `u8` arrays with a fixed channel order,
// and back. Conversions always allocate; nothing is aliased across the two
// representations.

use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::types::{PixelFormat, RasterImage};
use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{debug, instrument};

/// Dense image array the scan pipeline operates on.
///
/// Luma arrays have one sample per pixel; colour arrays are always
/// red-green-blue regardless of the host's byte order.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl NumericArray {
    pub fn width(&self) -> u32 {
        match self {
            Self::Gray(img) => img.width(),
            Self::Rgb(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Gray(img) => img.height(),
            Self::Rgb(img) => img.height(),
        }
    }

    /// Samples per pixel (1 or 3).
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    /// Luma copy of the array.
    pub fn to_gray(&self) -> GrayImage {
        match self {
            Self::Gray(img) => img.clone(),
            Self::Rgb(img) => image::imageops::grayscale(img),
        }
    }
}

/// Copy a host raster into a [`NumericArray`].
///
/// `Gray8` becomes a luma array; every colour format becomes an RGB array
/// (blue-first layouts are swizzled, alpha is dropped). Fails with
/// `InvalidImage` for empty images, unsupported formats, or buffers that are
/// too short for the declared stride.
#[instrument(skip(raster), fields(width = raster.width, height = raster.height, format = ?raster.format))]
pub fn to_numeric_array(raster: &RasterImage) -> Result<NumericArray> {
    raster.validate()?;

    let array = match raster.format {
        PixelFormat::Gray8 => {
            let samples = gather(raster, 1, &[0]);
            NumericArray::Gray(
                GrayImage::from_raw(raster.width, raster.height, samples)
                    .ok_or_else(|| size_mismatch(raster))?,
            )
        }
        PixelFormat::Rgb24 | PixelFormat::Bgr24 | PixelFormat::Rgba32 | PixelFormat::Bgra32 => {
            let (bpp, order) = match raster.format {
                PixelFormat::Rgb24 => (3, [0, 1, 2]),
                PixelFormat::Bgr24 => (3, [2, 1, 0]),
                PixelFormat::Rgba32 => (4, [0, 1, 2]),
                _ => (4, [2, 1, 0]),
            };
            let samples = gather(raster, bpp, &order);
            NumericArray::Rgb(
                RgbImage::from_raw(raster.width, raster.height, samples)
                    .ok_or_else(|| size_mismatch(raster))?,
            )
        }
        PixelFormat::Indexed8 | PixelFormat::Mono1 => {
            return Err(FlatscanError::InvalidImage(format!(
                "unsupported pixel format {:?}",
                raster.format
            )));
        }
    };

    debug!(channels = array.channels(), "Raster copied into numeric array");
    Ok(array)
}

/// Copy a [`NumericArray`] back into a tightly packed host raster.
///
/// Luma arrays become `Gray8`, colour arrays become `Rgb24`.
pub fn from_numeric_array(array: &NumericArray) -> RasterImage {
    match array {
        NumericArray::Gray(img) => RasterImage::packed(
            img.width(),
            img.height(),
            PixelFormat::Gray8,
            img.as_raw().clone(),
        ),
        NumericArray::Rgb(img) => RasterImage::packed(
            img.width(),
            img.height(),
            PixelFormat::Rgb24,
            img.as_raw().clone(),
        ),
    }
}

/// Build a host raster from a decoded `image` crate picture.
///
/// Pictures without colour channels stay single-channel.
pub fn raster_from_dynamic(image: &DynamicImage) -> RasterImage {
    if image.color().has_color() {
        let rgb = image.to_rgb8();
        RasterImage::packed(rgb.width(), rgb.height(), PixelFormat::Rgb24, rgb.into_raw())
    } else {
        let gray = image.to_luma8();
        RasterImage::packed(gray.width(), gray.height(), PixelFormat::Gray8, gray.into_raw())
    }
}

/// Convert a host raster into a `DynamicImage` for encoding.
pub fn raster_to_dynamic(raster: &RasterImage) -> Result<DynamicImage> {
    Ok(match to_numeric_array(raster)? {
        NumericArray::Gray(img) => DynamicImage::ImageLuma8(img),
        NumericArray::Rgb(img) => DynamicImage::ImageRgb8(img),
    })
}

/// Copy the selected byte offsets of every pixel, row by row, skipping the
/// stride padding.
fn gather(raster: &RasterImage, bytes_per_pixel: usize, channels: &[usize]) -> Vec<u8> {
    let width = raster.width as usize;
    let row_bytes = width * bytes_per_pixel;
    let mut out = Vec::with_capacity(width * raster.height as usize * channels.len());

    for y in 0..raster.height as usize {
        let start = y * raster.stride;
        let row = &raster.data[start..start + row_bytes];
        for pixel in row.chunks_exact(bytes_per_pixel) {
            out.extend(channels.iter().map(|&c| pixel[c]));
        }
    }

    out
}

fn size_mismatch(raster: &RasterImage) -> FlatscanError {
    FlatscanError::InvalidImage(format!(
        "buffer does not match {}x{} {:?}",
        raster.width, raster.height, raster.format
    ))
}
