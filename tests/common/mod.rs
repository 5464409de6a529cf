// Shared fixtures for the integration tests.
//
// Everything is synthesised in memory so the suite needs no asset files.

#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use lele_counter::{TEMPLATE_HEIGHT, TEMPLATE_WIDTH};
use std::path::PathBuf;

/// Controls whether annotated outputs are written next to the test binary.
pub const DEBUG_OUTPUT: bool = false;

pub const BACKGROUND: Rgb<u8> = Rgb([230, 230, 230]);
pub const FRY: Rgb<u8> = Rgb([25, 25, 25]);

/// White ellipse filling the canonical frame on black.
pub fn ellipse_template() -> GrayImage {
    let (w, h) = (TEMPLATE_WIDTH as f32, TEMPLATE_HEIGHT as f32);
    let (cx, cy) = ((w - 1.0) / 2.0, (h - 1.0) / 2.0);
    GrayImage::from_fn(TEMPLATE_WIDTH, TEMPLATE_HEIGHT, |x, y| {
        let dx = (x as f32 - cx) / (w / 2.0);
        let dy = (y as f32 - cy) / (h / 2.0);
        Luma([if dx * dx + dy * dy <= 1.0 { 255 } else { 0 }])
    })
}

/// White lower-left triangle (below the top-left to bottom-right diagonal).
pub fn triangle_template() -> GrayImage {
    GrayImage::from_fn(TEMPLATE_WIDTH, TEMPLATE_HEIGHT, |x, y| {
        let u = x as f32 / TEMPLATE_WIDTH as f32;
        let v = y as f32 / TEMPLATE_HEIGHT as f32;
        Luma([if v > u { 255 } else { 0 }])
    })
}

pub fn blank_scene(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKGROUND)
}

pub fn paint_ellipse(img: &mut RgbImage, cx: i32, cy: i32, a: i32, b: i32) {
    for y in (cy - b)..=(cy + b) {
        for x in (cx - a)..=(cx + a) {
            if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
                continue;
            }
            let dx = (x - cx) as f32 / a as f32;
            let dy = (y - cy) as f32 / b as f32;
            if dx * dx + dy * dy <= 1.0 {
                img.put_pixel(x as u32, y as u32, FRY);
            }
        }
    }
}

pub fn paint_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, FRY);
        }
    }
}

/// Lower-right triangle inside the `w`x`h` box at (`x0`, `y0`): the
/// triangle template turned a quarter counter-clockwise.
pub fn paint_lower_right_triangle(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
    for y in 0..h {
        for x in 0..w {
            let u = x as f32 / w as f32;
            let v = y as f32 / h as f32;
            if v > 1.0 - u {
                img.put_pixel(x0 + x, y0 + y, FRY);
            }
        }
    }
}

/// Three fry-sized ellipses (area about 20 000 px) in a row.
pub fn three_fry_scene() -> RgbImage {
    let mut img = blank_scene(900, 420);
    for cx in [150, 450, 750] {
        paint_ellipse(&mut img, cx, 210, 40, 160);
    }
    img
}

/// A scratch directory unique to this test process.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lele_counter_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Labels are drawn in pure blue; nothing else in a synthetic scene is.
pub fn is_label_pixel(p: &Rgb<u8>) -> bool {
    p[2] > 200 && p[0] < 60 && p[1] < 60
}
