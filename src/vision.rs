//! Pure image-processing components: color segmentation, morphological
//! cleanup, and contour candidate extraction.
//!
//! Everything in this module is a function of its inputs; session state
//! lives in [`crate::tracker`].

mod color;
mod contour;
mod morphology;
mod rect;

pub use color::{ColorRange, Hsv, VisionError, mask_in_range, rgb_to_hsv, segment, to_hsv};
pub use contour::{AreaBand, CandidateFilter, CandidateSet, DetectionCandidate, extract_candidates};
pub use morphology::clean_mask;
pub use rect::Rect;
