// src/imaging/matcher.rs

use crate::config::{DetectorConfig, TEMPLATE_HEIGHT, TEMPLATE_PIXELS, TEMPLATE_WIDTH};
use crate::imaging::loader::TemplateBank;
use crate::imaging::resample::resize_area;
use image::{imageops, GrayImage, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use log::debug;

/// Result of matching one candidate against the bank.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMatch {
    /// Position of the matching template in the bank.
    pub template_index: usize,
    /// Rotation of that template, in degrees.
    pub rotation_degrees: f32,
    /// Number of agreeing pixels (fractional at anti-aliased edges).
    pub agreement: f64,
}

impl TemplateMatch {
    /// Agreement as a fraction of the canonical raster.
    pub fn score(&self) -> f64 {
        self.agreement / TEMPLATE_PIXELS as f64
    }
}

/// Zero border added before warping so the bicubic window reaches every
/// source pixel instead of falling back to the fill value near the edges.
const ROTATION_PAD: u32 = 3;

/// Rotate counter-clockwise by `degrees`, growing the canvas so the whole
/// rotated raster fits. Uncovered canvas is zero.
pub fn rotate_expanded(image: &GrayImage, degrees: f32) -> GrayImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || degrees.rem_euclid(360.0) == 0.0 {
        return image.clone();
    }

    let theta = degrees.to_radians();
    let (sin, cos) = (theta as f64).sin_cos();
    let out_w = ((w as f64 * cos.abs() + h as f64 * sin.abs()).round() as u32).max(1);
    let out_h = ((w as f64 * sin.abs() + h as f64 * cos.abs()).round() as u32).max(1);

    let mut padded = GrayImage::new(w + 2 * ROTATION_PAD, h + 2 * ROTATION_PAD);
    imageops::replace(&mut padded, image, ROTATION_PAD as i64, ROTATION_PAD as i64);

    let src_cx = (w as f32 - 1.0) / 2.0 + ROTATION_PAD as f32;
    let src_cy = (h as f32 - 1.0) / 2.0 + ROTATION_PAD as f32;
    let dst_cx = (out_w as f32 - 1.0) / 2.0;
    let dst_cy = (out_h as f32 - 1.0) / 2.0;

    // imageproc rotates clockwise in y-down coordinates
    let projection = Projection::translate(dst_cx, dst_cy)
        * Projection::rotate(-theta)
        * Projection::translate(-src_cx, -src_cy);

    let mut out = GrayImage::new(out_w, out_h);
    warp_into(&padded, &projection, Interpolation::Bicubic, Luma([0]), &mut out);
    out
}

/// Rotate a canonical template and squeeze it back to the canonical size.
pub fn rotated_canonical(template: &GrayImage, degrees: f32) -> GrayImage {
    let rotated = rotate_expanded(template, degrees);
    resize_area(&rotated, TEMPLATE_WIDTH, TEMPLATE_HEIGHT)
}

/// Pixelwise agreement: Σ (255 - (a XOR b)) / 255.
///
/// Binary rasters contribute exactly 1 per agreeing pixel; grey levels on
/// resampled edges contribute fractionally.
pub fn agreement(a: &GrayImage, b: &GrayImage) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let sum: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .map(|(&pa, &pb)| (!(pa ^ pb)) as u64)
        .sum();
    sum as f64 / 255.0
}

/// Every template pre-rotated at every angle of the search grid.
///
/// Holds exactly the rasters a per-candidate rotate-then-resize would
/// produce, computed once per bank.
#[derive(Debug, Clone)]
pub struct RotationCache {
    angles: Vec<f32>,
    /// `rotations[template][step]`
    rotations: Vec<Vec<GrayImage>>,
}

impl RotationCache {
    pub fn build(bank: &TemplateBank, config: &DetectorConfig) -> Self {
        let steps = config.rotation_steps.max(1);
        let angles: Vec<f32> = (0..steps).map(|s| config.rotation_angle(s)).collect();

        let rotations = bank
            .iter()
            .map(|template| {
                angles
                    .iter()
                    .map(|&angle| rotated_canonical(template.raster(), angle))
                    .collect()
            })
            .collect();

        debug!("Rotation cache: {} templates x {} angles", bank.len(), angles.len());
        Self { angles, rotations }
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    #[cfg(test)]
    pub(crate) fn template_count(&self) -> usize {
        self.rotations.len()
    }

    #[cfg(test)]
    pub(crate) fn rotation(&self, template_index: usize, step: usize) -> Option<&GrayImage> {
        self.rotations.get(template_index)?.get(step)
    }

    /// First (template, angle) pair, in bank order then ascending angle,
    /// whose agreement with `candidate` exceeds `threshold` of the raster.
    ///
    /// `candidate` must already be at the canonical size.
    pub fn first_match(&self, candidate: &GrayImage, threshold: f64) -> Option<TemplateMatch> {
        let required = threshold * TEMPLATE_PIXELS as f64;

        for (template_index, rotations) in self.rotations.iter().enumerate() {
            for (step, rotated) in rotations.iter().enumerate() {
                let score = agreement(rotated, candidate);
                if score > required {
                    return Some(TemplateMatch {
                        template_index,
                        rotation_degrees: self.angles[step],
                        agreement: score,
                    });
                }
            }
        }

        None
    }
}
