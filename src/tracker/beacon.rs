use image::RgbImage;
use serde::Serialize;
use tracing::debug;

use crate::vision::{
    AreaBand, CandidateFilter, ColorRange, clean_mask, extract_candidates, mask_in_range,
};

/// Visibility cache for the fixed reference beacon.
///
/// `last_known` is overwritten only by a fresh observation and persists
/// across frames where the beacon is occluded, so the landing check keeps
/// a stable reference line through momentary occlusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BeaconState {
    /// Position observed this frame, if any.
    pub current: Option<(f32, f32)>,
    /// Most recent actually-observed position.
    pub last_known: Option<(f32, f32)>,
}

impl BeaconState {
    /// Whether the beacon was seen this frame.
    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// The landing reference: this frame's position if visible, else the
    /// cached one. `None` until the beacon has been seen at least once.
    pub fn reference(&self) -> Option<(f32, f32)> {
        self.current.or(self.last_known)
    }

    /// Record this frame's observation.
    pub fn observe(&mut self, observation: Option<(f32, f32)>) {
        self.current = observation;
        if observation.is_some() {
            self.last_known = observation;
        }
    }
}

/// Locates the reference beacon by running the segmentation pipeline
/// against the beacon color range and area band.
#[derive(Debug, Clone)]
pub struct BeaconLocator {
    range: ColorRange,
    filter: CandidateFilter,
    state: BeaconState,
}

impl BeaconLocator {
    /// Beacon candidates are filtered by area only; the aspect ceiling
    /// applies to darts, not to the beacon.
    pub fn new(range: ColorRange, area: AreaBand) -> Self {
        Self {
            range,
            filter: CandidateFilter::area_only(area),
            state: BeaconState::default(),
        }
    }

    pub fn state(&self) -> &BeaconState {
        &self.state
    }

    /// Run one detection pass over the HSV working frame and update the
    /// visibility cache. At most one beacon position is reported per
    /// frame: the top-ranked qualifying candidate; the rest are ignored.
    pub fn locate(&mut self, hsv: &RgbImage, scale: f32) -> &BeaconState {
        let mask = clean_mask(&mask_in_range(hsv, &self.range));
        let candidates = extract_candidates(&mask, scale, &self.filter);
        let observation = candidates.primary().map(|c| c.center);
        if observation.is_none() && self.state.last_known.is_some() {
            debug!(cached = ?self.state.last_known, "beacon occluded, using cached position");
        }
        self.state.observe(observation);
        &self.state
    }
}
