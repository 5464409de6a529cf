//! Tunable constants for template loading and detection.
//!
//! The defaults are the values the counter was calibrated with for a fixed
//! tank camera; changing them changes which blobs count as fry.

use image::Rgb;

/// Canonical template width in pixels.
pub const TEMPLATE_WIDTH: u32 = 64;
/// Canonical template height in pixels.
pub const TEMPLATE_HEIGHT: u32 = 128;
/// Pixel count of one canonical raster.
pub const TEMPLATE_PIXELS: u32 = TEMPLATE_WIDTH * TEMPLATE_HEIGHT;

/// What the loader does with a template file that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFailurePolicy {
    /// Fail the whole load; no partial bank is returned.
    #[default]
    Abort,
    /// Log a warning and continue with the remaining files.
    Skip,
}

/// Options for [`crate::load_templates_with`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub on_decode_failure: DecodeFailurePolicy,
}

impl LoadOptions {
    pub fn with_decode_policy(mut self, policy: DecodeFailurePolicy) -> Self {
        self.on_decode_failure = policy;
        self
    }
}

/// Detection parameters.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Contrast gain applied before thresholding.
    pub alpha: f32,
    /// Brightness offset applied before thresholding.
    pub beta: f32,
    /// Erode/dilate passes of the 3x3 opening.
    pub opening_iterations: u8,
    /// Exclusive lower bound on contour area.
    pub min_area: f64,
    /// Exclusive upper bound on contour area.
    pub max_area: f64,
    /// Number of evenly spaced rotations tried per template (36 = 10° steps).
    pub rotation_steps: u32,
    /// Fraction of the canonical raster that must agree for a match.
    pub threshold: f64,
    /// Label colour.
    pub label_colour: Rgb<u8>,
    /// Label glyph height in pixels.
    pub label_scale: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            alpha: 1.8,
            beta: 10.0,
            opening_iterations: 2,
            min_area: 6000.0,
            max_area: 50000.0,
            rotation_steps: 36,
            threshold: 0.5,
            label_colour: Rgb([0, 0, 255]),
            label_scale: 90.0,
        }
    }
}

impl DetectorConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_area_band(mut self, min_area: f64, max_area: f64) -> Self {
        self.min_area = min_area;
        self.max_area = max_area;
        self
    }

    pub fn with_rotation_steps(mut self, steps: u32) -> Self {
        self.rotation_steps = steps;
        self
    }

    pub fn with_contrast(mut self, alpha: f32, beta: f32) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Angle in degrees of the `step`th rotation.
    pub fn rotation_angle(&self, step: u32) -> f32 {
        if self.rotation_steps == 0 {
            return 0.0;
        }
        step as f32 * 360.0 / self.rotation_steps as f32
    }
}
