//! Mask preparation: contrast stretch, luminance, automatic inverted
//! threshold and morphological opening.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

/// Linear contrast transform `saturate(round(alpha * v + beta))` on every channel.
pub fn enhance_contrast(image: &RgbImage, alpha: f32, beta: f32) -> RgbImage {
    let mut out = image.clone();
    for channel in out.iter_mut() {
        *channel = (alpha * *channel as f32 + beta).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// BT.601 luma of a single RGB pixel.
#[inline]
pub fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Converts a colour raster to single-channel intensity with BT.601 weights.
pub fn luminance(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        Luma([luma_bt601(p[0], p[1], p[2])])
    })
}

/// Otsu-thresholds `gray` and inverts the result: pixels at or below the
/// level become foreground (255), the rest background (0).
///
/// Returns the mask together with the level that was chosen.
pub fn binarize_inverted(gray: &GrayImage) -> (GrayImage, u8) {
    let level = otsu_level(gray);
    let mut mask = gray.clone();
    for value in mask.iter_mut() {
        *value = if *value <= level { 255 } else { 0 };
    }
    (mask, level)
}

/// Morphological opening with a 3x3 square, repeated `iterations` times.
///
/// `iterations` erosions followed by `iterations` dilations equal one
/// erosion and one dilation within Chebyshev distance `iterations`.
pub fn open(mask: &GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 {
        return mask.clone();
    }
    let eroded = erode(mask, Norm::LInf, iterations);
    dilate(&eroded, Norm::LInf, iterations)
}

/// Runs the whole chain and returns `(enhanced colour image, cleaned mask)`.
pub fn prepare_mask(image: &RgbImage, alpha: f32, beta: f32, iterations: u8) -> (RgbImage, GrayImage) {
    let enhanced = enhance_contrast(image, alpha, beta);
    let gray = luminance(&enhanced);
    let (binary, level) = binarize_inverted(&gray);
    log::debug!("Otsu level {} on {}x{} image", level, gray.width(), gray.height());
    let cleaned = open(&binary, iterations);
    (enhanced, cleaned)
}
