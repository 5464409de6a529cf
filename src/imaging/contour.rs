use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Open interval of accepted contour areas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBand {
    pub min: f64,
    pub max: f64,
}

impl AreaBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Strict on both ends.
    pub fn contains(&self, area: f64) -> bool {
        self.min < area && area < self.max
    }
}

/// A contour that survived area filtering.
#[derive(Debug, Clone)]
pub struct CandidateRegion {
    pub bbox: Rect,
    /// Contour with straight runs reduced to their end points.
    pub polygon: Vec<Point<i32>>,
    pub area: f64,
    pub is_hole: bool,
}

/// Drops every point that continues the previous step's direction, so
/// horizontal, vertical and diagonal runs keep only their end points.
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut pts = points.to_vec();
    pts.dedup();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    let n = pts.len();
    if n < 3 {
        return pts;
    }

    (0..n)
        .filter(|&i| {
            let prev = pts[(i + n - 1) % n];
            let cur = pts[i];
            let next = pts[(i + 1) % n];
            let incoming = ((cur.x - prev.x).signum(), (cur.y - prev.y).signum());
            let outgoing = ((next.x - cur.x).signum(), (next.y - cur.y).signum());
            incoming != outgoing
        })
        .map(|i| pts[i])
        .collect()
}

/// Shoelace area of a closed polygon through pixel centres.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: i64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum();
    twice.abs() as f64 / 2.0
}

/// Smallest axis-aligned rectangle containing every point.
pub fn bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32))
}

/// Traces every border of `mask` (outer borders and holes, full nesting)
/// and keeps the ones whose enclosed area lies inside `band`.
///
/// Returns the survivors in tracing order along with the total number of
/// contours found.
pub fn extract_candidates(mask: &GrayImage, band: AreaBand) -> (Vec<CandidateRegion>, usize) {
    let contours = find_contours::<i32>(mask);
    let total = contours.len();

    let candidates = contours
        .into_iter()
        .filter_map(|contour| {
            let polygon = compress_chain(&contour.points);
            let area = polygon_area(&polygon);
            if !band.contains(area) {
                return None;
            }
            let bbox = bounding_rect(&polygon)?;
            Some(CandidateRegion {
                bbox,
                polygon,
                area,
                is_hole: matches!(contour.border_type, BorderType::Hole),
            })
        })
        .collect();

    (candidates, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill_rect(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn band_is_exclusive() {
        let band = AreaBand::new(6000.0, 50000.0);
        assert!(!band.contains(6000.0));
        assert!(band.contains(6001.0));
        assert!(band.contains(49999.0));
        assert!(!band.contains(50000.0));
    }

    #[test]
    fn compress_keeps_only_corners_of_a_rectangle() {
        let mut pts = Vec::new();
        for x in 0..5 {
            pts.push(Point::new(x, 0));
        }
        for y in 1..4 {
            pts.push(Point::new(4, y));
        }
        for x in (0..5).rev() {
            pts.push(Point::new(x, 3));
        }
        for y in (1..3).rev() {
            pts.push(Point::new(0, y));
        }
        let compressed = compress_chain(&pts);
        assert_eq!(
            compressed,
            vec![Point::new(0, 0), Point::new(4, 0), Point::new(4, 3), Point::new(0, 3)]
        );
        assert_eq!(polygon_area(&compressed), 12.0);
    }

    #[test]
    fn rectangle_area_is_measured_between_pixel_centres() {
        let mut mask = GrayImage::new(100, 100);
        fill_rect(&mut mask, 10, 20, 30, 40);
        let (regions, total) = extract_candidates(&mask, AreaBand::new(0.0, f64::MAX));
        assert_eq!(total, 1);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 29.0 * 39.0);
        assert_eq!(regions[0].bbox, Rect::at(10, 20).of_size(30, 40));
        assert!(!regions[0].is_hole);
    }

    #[test]
    fn area_band_boundaries_on_real_blobs() {
        let band = AreaBand::new(6000.0, 50000.0);
        let mut areas = Vec::new();
        for (w, h) in [(61, 101), (18, 354), (201, 251)] {
            let mut mask = GrayImage::new(w + 20, h + 20);
            fill_rect(&mut mask, 10, 10, w, h);
            let (kept, _) = extract_candidates(&mask, band);
            areas.push(kept.len());
        }
        // 6000 out, 6001 in, 50000 out
        assert_eq!(areas, vec![0, 1, 0]);

        // 50000 minus two half-pixel corner cuts = 49999
        let mut mask = GrayImage::new(221, 271);
        fill_rect(&mut mask, 10, 10, 201, 251);
        mask.put_pixel(10, 10, Luma([0]));
        mask.put_pixel(210, 260, Luma([0]));
        let (kept, _) = extract_candidates(&mask, band);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].area, 49999.0);
    }

    #[test]
    fn holes_are_reported_as_candidates_too() {
        let mut mask = GrayImage::new(200, 200);
        fill_rect(&mut mask, 10, 10, 180, 180);
        for y in 40..160 {
            for x in 40..160 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let (regions, total) = extract_candidates(&mask, AreaBand::new(0.0, f64::MAX));
        assert_eq!(total, 2);
        assert_eq!(regions.iter().filter(|r| r.is_hole).count(), 1);
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = GrayImage::new(50, 50);
        let (regions, total) = extract_candidates(&mask, AreaBand::new(0.0, f64::MAX));
        assert!(regions.is_empty());
        assert_eq!(total, 0);
    }
}
