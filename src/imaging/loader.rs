use crate::config::{DecodeFailurePolicy, LoadOptions, TEMPLATE_HEIGHT, TEMPLATE_WIDTH};
use crate::error::{FryCountError, Result};
use crate::imaging::preprocess::luminance;
use crate::imaging::resample::resize_area;
use image::{DynamicImage, GrayImage};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Extensions accepted as template rasters (compared case-insensitively).
pub const TEMPLATE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// A reference silhouette normalised to the canonical 64x128 raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    raster: GrayImage,
}

impl Template {
    /// Load a template from file, decoding it as colour first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?;
        Ok(Self::from_dynamic_image(img))
    }

    /// Reduce any decoded image to luminance and canonicalise its size.
    pub fn from_dynamic_image(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(gray) => Self::from_gray(&gray),
            DynamicImage::ImageRgb8(rgb) => Self::from_gray(&luminance(&rgb)),
            other => {
                // Alpha and wide formats go through 8-bit RGB first
                let rgb = other.to_rgb8();
                Self::from_gray(&luminance(&rgb))
            }
        }
    }

    pub fn from_gray(gray: &GrayImage) -> Self {
        Self {
            raster: canonicalize(gray),
        }
    }

    pub fn raster(&self) -> &GrayImage {
        &self.raster
    }
}

/// Resize a single-channel raster to the canonical template size.
pub fn canonicalize(gray: &GrayImage) -> GrayImage {
    resize_area(gray, TEMPLATE_WIDTH, TEMPLATE_HEIGHT)
}

/// Ordered, immutable collection of templates. Order is the tie-break when
/// several templates would match the same candidate.
#[derive(Debug, Clone, Default)]
pub struct TemplateBank {
    templates: Vec<Template>,
}

impl TemplateBank {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Build a bank from in-memory silhouettes of any size.
    pub fn from_images<'a, I>(images: I) -> Self
    where
        I: IntoIterator<Item = &'a GrayImage>,
    {
        Self::new(images.into_iter().map(Template::from_gray).collect())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }
}

impl<'a> IntoIterator for &'a TemplateBank {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

/// Check whether a path carries one of the accepted raster extensions.
pub fn is_template_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            TEMPLATE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Load every template in `directory`, aborting on the first file that
/// fails to decode.
pub fn load_templates<P: AsRef<Path>>(directory: P) -> Result<TemplateBank> {
    load_templates_with(directory, &LoadOptions::default())
}

/// Load every template in `directory` with explicit options.
///
/// Files are visited in file-name order. Non-image files are skipped
/// silently; decode failures follow `options.on_decode_failure`.
pub fn load_templates_with<P: AsRef<Path>>(directory: P, options: &LoadOptions) -> Result<TemplateBank> {
    let directory = directory.as_ref();
    let entries = std::fs::read_dir(directory).map_err(|e| {
        FryCountError::TemplateLoad(format!("cannot read template directory {}: {}", directory.display(), e))
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            FryCountError::TemplateLoad(format!("cannot list {}: {}", directory.display(), e))
        })?;
        let path = entry.path();
        if path.is_file() && is_template_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = Vec::with_capacity(paths.len());
    for path in &paths {
        match Template::from_file(path) {
            Ok(template) => {
                debug!("Loaded template {}", path.display());
                templates.push(template);
            }
            Err(e) => match options.on_decode_failure {
                DecodeFailurePolicy::Abort => {
                    return Err(FryCountError::TemplateLoad(format!(
                        "failed to decode {}: {}",
                        path.display(),
                        e
                    )));
                }
                DecodeFailurePolicy::Skip => {
                    warn!("Skipping template {}: {}", path.display(), e);
                }
            },
        }
    }

    info!("Loaded {} templates from {}", templates.len(), directory.display());
    Ok(TemplateBank::new(templates))
}
