use image::{GrayImage, Luma};

/// Source pixels covered by one destination pixel along an axis, with the
/// fraction of each source pixel that falls inside it.
fn coverage(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);

            (first..last)
                .filter_map(|s| {
                    let overlap = (end.min(s as f64 + 1.0) - start.max(s as f64)).max(0.0);
                    (overlap > 0.0).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}

/// Resizes a grayscale raster by pixel-area averaging.
///
/// Every destination pixel is the coverage-weighted mean of the source
/// pixels its footprint overlaps, so downscaling does not alias. When
/// enlarging, footprints are smaller than one source pixel and this reduces
/// to pixel replication with blended seams.
pub fn resize_area(src: &GrayImage, width: u32, height: u32) -> GrayImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    if src.width() == 0 || src.height() == 0 {
        return GrayImage::new(width, height);
    }

    let cols = coverage(src.width(), width);
    let rows = coverage(src.height(), height);

    let mut out = GrayImage::new(width, height);
    for (y, row) in rows.iter().enumerate() {
        let row_weight: f64 = row.iter().map(|&(_, w)| w).sum();
        for (x, col) in cols.iter().enumerate() {
            let col_weight: f64 = col.iter().map(|&(_, w)| w).sum();

            let mut sum = 0.0;
            for &(sy, wy) in row {
                for &(sx, wx) in col {
                    sum += src.get_pixel(sx, sy)[0] as f64 * wx * wy;
                }
            }

            let value = sum / (row_weight * col_weight);
            out.put_pixel(x as u32, y as u32, Luma([value.round().clamp(0.0, 255.0) as u8]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halving_averages_blocks() {
        let src = GrayImage::from_fn(4, 2, |x, _| if x < 2 { Luma([0]) } else { Luma([200]) });
        let out = resize_area(&src, 2, 1);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 200);
    }

    #[test]
    fn fractional_footprints_blend() {
        // 3 -> 2: each output covers 1.5 source pixels.
        let src = GrayImage::from_raw(3, 1, vec![0, 90, 180]).unwrap();
        let out = resize_area(&src, 2, 1);
        assert_eq!(out.get_pixel(0, 0)[0], 30);
        assert_eq!(out.get_pixel(1, 0)[0], 150);
    }

    #[test]
    fn enlarging_replicates() {
        let src = GrayImage::from_raw(2, 1, vec![10, 250]).unwrap();
        let out = resize_area(&src, 4, 2);
        assert_eq!(out.as_raw(), &vec![10, 10, 250, 250, 10, 10, 250, 250]);
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = GrayImage::from_fn(5, 7, |x, y| Luma([(x * 7 + y) as u8]));
        assert_eq!(resize_area(&src, 5, 7), src);
    }

    #[test]
    fn uniform_stays_uniform() {
        let src = GrayImage::from_pixel(333, 97, Luma([255]));
        let out = resize_area(&src, 64, 128);
        assert!(out.pixels().all(|p| p[0] == 255));
    }
}
