// src/detector.rs

use crate::config::{DetectorConfig, TEMPLATE_HEIGHT, TEMPLATE_WIDTH};
use crate::error::{FryCountError, Result};
use crate::imaging::contour::{extract_candidates, AreaBand};
use crate::imaging::loader::TemplateBank;
use crate::imaging::matcher::{RotationCache, TemplateMatch};
use crate::imaging::preprocess::prepare_mask;
use crate::imaging::resample::resize_area;
use crate::imaging::{draw_count_label, label_font};
use ab_glyph::FontRef;
use image::{imageops, RgbImage};
use imageproc::rect::Rect;
use log::{debug, info};

/// A candidate region that matched a template.
#[derive(Debug, Clone)]
pub struct MatchedRegion {
    /// The count value drawn for this region (1-based).
    pub label: usize,
    pub bbox: Rect,
    pub area: f64,
    pub template: TemplateMatch,
}

/// Output of one detection call.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Contrast-enhanced copy of the input with count labels drawn on it.
    pub annotated: RgbImage,
    /// Number of candidates classified as fry.
    pub count: usize,
    /// Matched regions in label order.
    pub matches: Vec<MatchedRegion>,
    /// Contours that passed the area filter (upper bound for `count`).
    pub candidates: usize,
}

/// Counts fry against a fixed template bank.
///
/// Holds only immutable state, so one detector can serve any number of
/// threads by shared reference.
pub struct Detector {
    config: DetectorConfig,
    cache: RotationCache,
    font: FontRef<'static>,
}

impl Detector {
    /// Pre-rotates every template in `bank` on the configured angle grid.
    pub fn new(bank: &TemplateBank, config: DetectorConfig) -> Result<Self> {
        let cache = RotationCache::build(bank, &config);
        let font = label_font()?;
        info!(
            "Detector ready: {} templates, {} rotations, threshold {:.2}",
            bank.len(),
            cache.angles().len(),
            config.threshold
        );
        Ok(Self { config, cache, font })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Segment `image`, match every area-filtered contour and label the hits.
    pub fn detect(&self, image: &RgbImage) -> Result<DetectionResult> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(FryCountError::InvalidImage(format!("image has zero size ({}x{})", width, height)));
        }

        let config = &self.config;
        let (mut annotated, mask) = prepare_mask(image, config.alpha, config.beta, config.opening_iterations);

        let band = AreaBand::new(config.min_area, config.max_area);
        let (regions, total_contours) = extract_candidates(&mask, band);
        debug!("{} contours, {} inside area band", total_contours, regions.len());

        let mut matches = Vec::new();
        for region in &regions {
            let bbox = region.bbox;
            let crop = imageops::crop_imm(&mask, bbox.left() as u32, bbox.top() as u32, bbox.width(), bbox.height())
                .to_image();
            let canonical = resize_area(&crop, TEMPLATE_WIDTH, TEMPLATE_HEIGHT);

            match self.cache.first_match(&canonical, config.threshold) {
                Some(template) => {
                    let label = matches.len() + 1;
                    draw_count_label(&mut annotated, &self.font, label, bbox, config.label_colour, config.label_scale);
                    debug!(
                        "Fry {} at {:?}: template {} @ {:.0}°, score {:.3}",
                        label,
                        bbox,
                        template.template_index,
                        template.rotation_degrees,
                        template.score()
                    );
                    matches.push(MatchedRegion {
                        label,
                        bbox,
                        area: region.area,
                        template,
                    });
                }
                None => {
                    debug!("Candidate at {:?} (area {:.0}) matched no template", bbox, region.area);
                }
            }
        }

        info!("Counted {} fry among {} candidates", matches.len(), regions.len());

        Ok(DetectionResult {
            annotated,
            count: matches.len(),
            matches,
            candidates: regions.len(),
        })
    }
}

/// One-shot detection with reference constants and the given threshold.
///
/// Builds the rotation cache on every call; keep a [`Detector`] around
/// when processing more than one image.
pub fn detect(image: &RgbImage, templates: &TemplateBank, threshold: f64) -> Result<DetectionResult> {
    let detector = Detector::new(templates, DetectorConfig::default().with_threshold(threshold))?;
    detector.detect(image)
}
