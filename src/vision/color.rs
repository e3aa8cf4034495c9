//! HSV color segmentation.
//!
//! Hue/saturation/value follow the OpenCV 8-bit convention (hue 0..=179,
//! saturation and value 0..=255) so that ranges tuned with OpenCV-based
//! capture tooling carry over unchanged.

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Error type for image-processing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisionError {
    /// The input frame has no pixels; the current cycle is skipped.
    #[error("invalid frame: zero area ({width}x{height})")]
    InvalidFrame { width: u32, height: u32 },
}

/// A color in 8-bit HSV (hue 0..=179, saturation/value 0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Inclusive lower/upper bounds in HSV, with optional hue wrap-around.
///
/// A wrapping range matches hue in `[lower.h, 179] ∪ [0, upper.h]`, which
/// is how red (spanning both ends of the hue axis) is expressed as a
/// single range. Saturation and value bounds never wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: Hsv,
    pub upper: Hsv,
    pub wrap_hue: bool,
}

impl ColorRange {
    /// A plain, non-wrapping range.
    pub fn new(lower: Hsv, upper: Hsv) -> Self {
        Self {
            lower,
            upper,
            wrap_hue: false,
        }
    }

    /// A range whose hue interval wraps past the top of the hue axis.
    pub fn wrapping(lower: Hsv, upper: Hsv) -> Self {
        Self {
            lower,
            upper,
            wrap_hue: true,
        }
    }

    /// Default range for the red dart head: hue 170..=179 union 0..=10.
    pub fn red_dart() -> Self {
        Self::wrapping(Hsv::new(170, 100, 100), Hsv::new(10, 255, 255))
    }

    /// Default range for the green reference beacon.
    pub fn green_beacon() -> Self {
        Self::new(Hsv::new(35, 50, 50), Hsv::new(90, 255, 255))
    }

    /// Whether the color falls inside the range (bounds inclusive).
    pub fn contains(&self, color: Hsv) -> bool {
        let hue_ok = if self.wrap_hue {
            color.h >= self.lower.h || color.h <= self.upper.h
        } else {
            color.h >= self.lower.h && color.h <= self.upper.h
        };
        hue_ok
            && color.s >= self.lower.s
            && color.s <= self.upper.s
            && color.v >= self.lower.v
            && color.v <= self.upper.v
    }
}

/// Convert a single RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if max == rf {
        let mut h = 60.0 * (gf - bf) / delta;
        if h < 0.0 {
            h += 360.0;
        }
        h
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };

    // Halved hue to fit 0..=179, as in 8-bit OpenCV images.
    let h = (h / 2.0).round() as u16 % 180;
    Hsv::new(h as u8, s.round() as u8, v.round() as u8)
}

/// Convert a whole frame to HSV, stored channel-for-channel in an
/// [`RgbImage`] buffer. Done once per cycle and shared by the dart and
/// beacon segmentation passes.
pub fn to_hsv(frame: &RgbImage) -> Result<RgbImage, VisionError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(VisionError::InvalidFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }
    let mut hsv = RgbImage::new(frame.width(), frame.height());
    for (dst, src) in hsv.pixels_mut().zip(frame.pixels()) {
        let Rgb([r, g, b]) = *src;
        let c = rgb_to_hsv(r, g, b);
        *dst = Rgb([c.h, c.s, c.v]);
    }
    Ok(hsv)
}

/// Binary mask over an HSV image: 255 where the pixel is inside `range`.
pub fn mask_in_range(hsv: &RgbImage, range: &ColorRange) -> GrayImage {
    let mut mask = GrayImage::new(hsv.width(), hsv.height());
    for (dst, src) in mask.pixels_mut().zip(hsv.pixels()) {
        let Rgb([h, s, v]) = *src;
        if range.contains(Hsv::new(h, s, v)) {
            dst.0[0] = 255;
        }
    }
    mask
}

/// Segment a frame against a color range in one step.
///
/// Pure function of its inputs; fails only on a zero-area frame.
pub fn segment(frame: &RgbImage, range: &ColorRange) -> Result<GrayImage, VisionError> {
    let hsv = to_hsv(frame)?;
    Ok(mask_in_range(&hsv, range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv::new(120, 255, 255));
    }

    #[test]
    fn test_rgb_to_hsv_grays() {
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(rgb_to_hsv(255, 255, 255), Hsv::new(0, 0, 255));
        assert_eq!(rgb_to_hsv(128, 128, 128), Hsv::new(0, 0, 128));
    }

    #[test]
    fn test_wrap_range_matches_both_hue_ends() {
        let red = ColorRange::red_dart();
        assert!(red.contains(Hsv::new(0, 200, 200)));
        assert!(red.contains(Hsv::new(175, 200, 200)));
        assert!(red.contains(Hsv::new(10, 200, 200)));
        assert!(!red.contains(Hsv::new(60, 200, 200)));
        // Saturation/value bounds still apply.
        assert!(!red.contains(Hsv::new(0, 50, 200)));
    }

    #[test]
    fn test_plain_range() {
        let green = ColorRange::green_beacon();
        assert!(green.contains(Hsv::new(60, 255, 255)));
        assert!(!green.contains(Hsv::new(120, 255, 255)));
        assert!(!green.contains(Hsv::new(60, 30, 255)));
    }

    #[test]
    fn test_segment_marks_in_range_pixels() {
        let mut frame = RgbImage::new(4, 4);
        frame.put_pixel(1, 2, image::Rgb([0, 255, 0]));
        let mask = segment(&frame, &ColorRange::green_beacon()).unwrap();
        assert_eq!(mask.get_pixel(1, 2).0[0], 255);
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_segment_rejects_zero_area_frame() {
        let frame = RgbImage::new(0, 0);
        let err = segment(&frame, &ColorRange::green_beacon()).unwrap_err();
        assert_eq!(
            err,
            VisionError::InvalidFrame {
                width: 0,
                height: 0
            }
        );
    }
}
