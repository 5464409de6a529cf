pub mod contour;
pub mod loader;
pub mod matcher;
pub mod preprocess;
pub mod resample;

use crate::error::{FryCountError, Result};
use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

const FONT_DATA: &[u8] = include_bytes!("../DejaVuSans.ttf");

/// Load the bundled label font.
pub fn label_font() -> Result<FontRef<'static>> {
    FontRef::try_from_slice(FONT_DATA).map_err(|_| FryCountError::Other("Failed to load font".to_string()))
}

/// Draw a running count at the left edge of `bbox`, centred vertically on it.
pub fn draw_count_label(
    image: &mut RgbImage,
    font: &FontRef<'_>,
    count: usize,
    bbox: Rect,
    colour: Rgb<u8>,
    scale: f32,
) {
    let scale = PxScale::from(scale);
    let text = count.to_string();
    let (_, text_height) = text_size(scale, font, &text);

    let centre_y = bbox.top() + bbox.height() as i32 / 2;
    let y = centre_y - text_height as i32 / 2;

    draw_text_mut(image, colour, bbox.left(), y, scale, font, &text);

    log::debug!("Label {} drawn at ({}, {})", count, bbox.left(), y);
}

/// Write the annotated image to `path`, creating missing parent directories.
pub fn save_annotated<P: AsRef<Path>>(
    image: &RgbImage,
    path: P,
    count: usize,
    processing_time: std::time::Duration,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image.save(path)?;
    log::info!(
        "Annotated output saved: {} with {} fry. Processing time: {:.3}ms",
        path.display(),
        count,
        processing_time.as_secs_f64() * 1000.0,
    );
    Ok(())
}
