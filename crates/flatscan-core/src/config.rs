// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FlatscanError, Result};

/// Tunable constants for document detection and rectification.
///
/// Hosts normally keep the defaults and override single fields when tuning
/// for a particular camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Images taller than this are downscaled before detection.
    pub max_working_height: u32,
    /// Gaussian sigma of the pre-edge blur (0.8 matches a 3x3 kernel).
    pub blur_sigma: f32,
    /// Relative spread around the median used to derive Canny thresholds.
    pub canny_sigma: f32,
    /// Dilation radius in pixels (1 = 3x3 square).
    pub dilate_radius: u8,
    /// Number of largest contours examined per attempt.
    pub max_candidates: usize,
    /// Minimum contour area as a fraction of the working frame area.
    pub min_area_fraction: f64,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_fraction: f64,
    /// Half-size of the adaptive threshold window (5 = 11x11).
    pub adaptive_block_radius: u32,
    /// Constant subtracted from the local mean in the adaptive threshold.
    pub adaptive_offset: i32,
    /// Run the adaptive-threshold attempt when the standard one fails.
    pub enable_fallback: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_working_height: 800,
            blur_sigma: 0.8,
            canny_sigma: 0.33,
            dilate_radius: 1,
            max_candidates: 15,
            min_area_fraction: 0.05,
            approx_epsilon_fraction: 0.015,
            adaptive_block_radius: 5,
            adaptive_offset: 2,
            enable_fallback: true,
        }
    }
}

impl ScanConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialise the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_working_height == 0 {
            return Err(FlatscanError::Config(
                "max_working_height must be positive".into(),
            ));
        }
        if !(self.blur_sigma > 0.0) {
            return Err(FlatscanError::Config("blur_sigma must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.canny_sigma) {
            return Err(FlatscanError::Config(format!(
                "canny_sigma must be in [0, 1), got {}",
                self.canny_sigma
            )));
        }
        if self.max_candidates == 0 {
            return Err(FlatscanError::Config(
                "max_candidates must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.min_area_fraction) {
            return Err(FlatscanError::Config(format!(
                "min_area_fraction must be in [0, 1), got {}",
                self.min_area_fraction
            )));
        }
        if !(self.approx_epsilon_fraction > 0.0) {
            return Err(FlatscanError::Config(
                "approx_epsilon_fraction must be positive".into(),
            ));
        }
        if self.adaptive_block_radius == 0 {
            return Err(FlatscanError::Config(
                "adaptive_block_radius must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
