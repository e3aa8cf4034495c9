//! Contour discovery and candidate extraction.
//!
//! Detection runs on a downscaled working copy of the frame, so every
//! extracted value is rescaled back to original-frame units here before
//! any filter is applied. External consumers never see scale-dependent
//! values.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

use crate::vision::rect::Rect;

/// Aspect ratios use this floor for the short side to avoid division by
/// zero on degenerate bounding boxes.
const ASPECT_EPSILON: f32 = 1e-5;

/// A filtered contour region considered a possible dart (or beacon).
///
/// All coordinates and the area are in original-frame units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionCandidate {
    /// Bounding-box center in original-frame coordinates.
    pub center: (f32, f32),
    /// Contour area in original-frame pixel units.
    pub area: f32,
    /// Bounding box in original-frame coordinates.
    pub bbox: Rect,
    /// `max(width, height) / max(min(width, height), epsilon)`, always >= 1.
    pub aspect_ratio: f32,
    /// `4*pi*area / perimeter^2`, in `[0, 1]`; 0 when the perimeter is
    /// degenerate (not an error condition).
    pub circularity: f32,
}

/// Inclusive area band filter, in original-frame pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaBand {
    pub min: f32,
    pub max: f32,
}

impl AreaBand {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, area: f32) -> bool {
        area >= self.min && area <= self.max
    }
}

/// Acceptance criteria for extracted candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateFilter {
    /// Inclusive area band, original-frame units.
    pub area: AreaBand,
    /// Hard aspect-ratio ceiling. Intentionally extreme (object shape is
    /// otherwise unconstrained); exceeding it moves a candidate to the
    /// diagnostic set instead of the accepted set.
    pub max_aspect_ratio: f32,
}

impl CandidateFilter {
    /// A filter with an area band and no effective aspect constraint.
    pub fn area_only(area: AreaBand) -> Self {
        Self {
            area,
            max_aspect_ratio: f32::INFINITY,
        }
    }
}

/// Result of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Candidates passing every filter, ranked area-descending with a
    /// topmost-then-leftmost tie-break. Consumers take index 0.
    pub accepted: Vec<DetectionCandidate>,
    /// Candidates inside the area band but over the aspect ceiling.
    /// Surfaced for diagnostic display only.
    pub rejected_shape: Vec<DetectionCandidate>,
}

impl CandidateSet {
    /// The top-ranked accepted candidate, if any.
    pub fn primary(&self) -> Option<&DetectionCandidate> {
        self.accepted.first()
    }
}

/// Find outer contours in a cleaned binary mask and reduce each to a
/// [`DetectionCandidate`], rescaled by `scale` back to original-frame
/// units (area by `scale^2`) and filtered by `filter`.
pub fn extract_candidates(mask: &GrayImage, scale: f32, filter: &CandidateFilter) -> CandidateSet {
    let mut set = CandidateSet::default();

    for contour in find_contours::<u32>(mask) {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let Some(candidate) = measure_contour(&contour.points, scale) else {
            continue;
        };
        if !filter.area.contains(candidate.area) {
            continue;
        }
        if candidate.aspect_ratio > filter.max_aspect_ratio {
            set.rejected_shape.push(candidate);
        } else {
            set.accepted.push(candidate);
        }
    }

    // Deterministic ranking: largest area first, ties broken by topmost
    // then leftmost center. "Candidate 0" is stable across runs.
    set.accepted.sort_by(|a, b| {
        b.area
            .total_cmp(&a.area)
            .then(a.center.1.total_cmp(&b.center.1))
            .then(a.center.0.total_cmp(&b.center.0))
    });

    set
}

/// Reduce an ordered boundary to a candidate. Returns `None` for empty
/// contours; zero-perimeter contours get circularity 0.
fn measure_contour(points: &[Point<u32>], scale: f32) -> Option<DetectionCandidate> {
    let first = points.first()?;

    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let area = polygon_area(points);
    let perimeter = closed_perimeter(points);
    let circularity = if perimeter > 0.0 {
        4.0 * std::f32::consts::PI * area / (perimeter * perimeter)
    } else {
        0.0
    };

    // Bounding box in inclusive pixel counts, boundingRect-style.
    let width = (max_x - min_x + 1) as f32;
    let height = (max_y - min_y + 1) as f32;
    let aspect_ratio = width.max(height) / width.min(height).max(ASPECT_EPSILON);

    let bbox = Rect::new(min_x as f32, min_y as f32, width, height).scaled(scale);

    Some(DetectionCandidate {
        center: bbox.center(),
        area: area * scale * scale,
        bbox,
        aspect_ratio,
        circularity,
    })
}

/// Shoelace area of the closed boundary polygon.
fn polygon_area(points: &[Point<u32>]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        twice_area += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    (twice_area.abs() / 2.0) as f32
}

/// Arc length of the boundary, including the closing segment.
fn closed_perimeter(points: &[Point<u32>]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut length = 0.0f64;
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        let dx = a.x as f64 - b.x as f64;
        let dy = a.y as f64 - b.y as f64;
        length += (dx * dx + dy * dy).sqrt();
    }
    length as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask(origin: u32, side: u32) -> GrayImage {
        let mut mask = GrayImage::new(64, 64);
        for y in origin..origin + side {
            for x in origin..origin + side {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        mask
    }

    fn any_filter() -> CandidateFilter {
        CandidateFilter {
            area: AreaBand::new(0.0, f32::MAX),
            max_aspect_ratio: 15.0,
        }
    }

    #[test]
    fn test_square_blob_geometry() {
        let mask = square_mask(10, 11);
        let set = extract_candidates(&mask, 1.0, &any_filter());
        assert_eq!(set.accepted.len(), 1);

        let c = &set.accepted[0];
        // Boundary polygon of an 11x11 filled square encloses 10x10 units.
        assert!((c.area - 100.0).abs() < 1.0, "area = {}", c.area);
        assert_eq!(c.bbox, Rect::new(10.0, 10.0, 11.0, 11.0));
        assert_eq!(c.center, (15.5, 15.5));
        assert!((c.aspect_ratio - 1.0).abs() < 1e-5);
        // 4*pi*A/P^2 for a square is pi/4.
        assert!(
            (c.circularity - std::f32::consts::FRAC_PI_4).abs() < 0.05,
            "circularity = {}",
            c.circularity
        );
    }

    #[test]
    fn test_area_round_trip_through_scale() {
        let mask = square_mask(8, 11);
        let unit = extract_candidates(&mask, 1.0, &any_filter());
        let scaled = extract_candidates(&mask, 2.0, &any_filter());
        let a1 = unit.accepted[0].area;
        let a2 = scaled.accepted[0].area;
        assert!((a2 - a1 * 4.0).abs() < 1e-3);
        assert_eq!(scaled.accepted[0].center.0, unit.accepted[0].center.0 * 2.0);
    }

    #[test]
    fn test_area_band_is_inclusive() {
        let mask = square_mask(10, 11); // area ~100
        let area = extract_candidates(&mask, 1.0, &any_filter()).accepted[0].area;

        let exact = CandidateFilter {
            area: AreaBand::new(area, area),
            max_aspect_ratio: 15.0,
        };
        assert_eq!(extract_candidates(&mask, 1.0, &exact).accepted.len(), 1);

        let below = CandidateFilter {
            area: AreaBand::new(area + 1.0, area + 100.0),
            max_aspect_ratio: 15.0,
        };
        assert!(extract_candidates(&mask, 1.0, &below).accepted.is_empty());
    }

    #[test]
    fn test_extreme_aspect_goes_to_diagnostic_set() {
        let mut mask = GrayImage::new(128, 32);
        // 100x2 bar: aspect ratio 50, far over the ceiling.
        for y in 10..12 {
            for x in 10..110 {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        let set = extract_candidates(&mask, 1.0, &any_filter());
        assert!(set.accepted.is_empty());
        assert_eq!(set.rejected_shape.len(), 1);
        assert!(set.rejected_shape[0].aspect_ratio > 15.0);
    }

    #[test]
    fn test_ranking_prefers_largest_area() {
        let mut mask = GrayImage::new(64, 64);
        for y in 5..10 {
            for x in 5..10 {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        for y in 30..45 {
            for x in 30..45 {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        let set = extract_candidates(&mask, 1.0, &any_filter());
        assert_eq!(set.accepted.len(), 2);
        assert!(set.accepted[0].area > set.accepted[1].area);
        assert_eq!(set.primary().unwrap().center, set.accepted[0].center);
    }

    #[test]
    fn test_empty_mask_yields_no_candidates() {
        let mask = GrayImage::new(32, 32);
        let set = extract_candidates(&mask, 2.0, &any_filter());
        assert!(set.accepted.is_empty());
        assert!(set.rejected_shape.is_empty());
        assert!(set.primary().is_none());
    }
}
