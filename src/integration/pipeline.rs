//! DartPipeline: one frame in, one structured result out.

use image::{RgbImage, imageops};
use serde::Serialize;
use tracing::debug;

use crate::integration::config::ConfigError;
use crate::tracker::{
    BeaconLocator, BeaconState, CompletedTrack, DartTracker, TrackEvent, TrackPhase, TrackerConfig,
};
use crate::vision::{
    AreaBand, CandidateFilter, ColorRange, DetectionCandidate, VisionError, clean_mask,
    extract_candidates, mask_in_range, to_hsv,
};

/// Static configuration for the per-frame pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Color range of the dart head (wrap-around for red).
    pub dart_range: ColorRange,
    /// Color range of the reference beacon.
    pub beacon_range: ColorRange,
    /// Dart area band, original-frame units.
    pub dart_area: AreaBand,
    /// Beacon area band, original-frame units.
    pub beacon_area: AreaBand,
    /// Hard aspect-ratio ceiling for dart candidates.
    pub max_aspect_ratio: f32,
    /// Spatial downscale factor for the detection pass. Purely a
    /// throughput trade-off; all reported values are in original units.
    pub detect_scale: u32,
    /// Trajectory state machine configuration.
    pub tracker: TrackerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dart_range: ColorRange::red_dart(),
            beacon_range: ColorRange::green_beacon(),
            dart_area: AreaBand::new(300.0, 10_000.0),
            beacon_area: AreaBand::new(100.0, 5_000.0),
            max_aspect_ratio: 15.0,
            detect_scale: 2,
            tracker: TrackerConfig::default(),
        }
    }
}

/// Error type for pipeline failures.
///
/// Every condition here is fatal to the current cycle only: the frame is
/// skipped and prior tracker state is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Structured per-cycle output handed back to the external collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Whether the beacon was seen this frame.
    pub beacon_visible: bool,
    /// Beacon position observed this frame, if any.
    pub beacon_position: Option<(f32, f32)>,
    /// Landing reference actually in use (current or cached). `None`
    /// means the beacon has never been seen and no landing detection is
    /// possible yet.
    pub beacon_reference: Option<(f32, f32)>,
    /// Qualifying dart candidates, ranked; index 0 drives the tracker.
    pub candidates: Vec<DetectionCandidate>,
    /// Candidates over the aspect ceiling, for diagnostic display only.
    pub rejected_candidates: Vec<DetectionCandidate>,
    /// Tracker phase after this cycle.
    pub phase: TrackPhase,
    /// Snapshot of the active trajectory, oldest point first.
    pub active_trajectory: Vec<(f32, f32)>,
    /// Completed tracks with landing points, oldest first.
    pub completed_tracks: Vec<CompletedTrack>,
    /// State-machine transition caused by this frame, if any.
    pub event: Option<TrackEvent>,
}

/// The per-frame detection-and-tracking pipeline.
///
/// Single-threaded and synchronous: the caller owns the frame loop and
/// every frame handed in is treated as an owned, non-aliased snapshot.
pub struct DartPipeline {
    dart_range: ColorRange,
    dart_filter: CandidateFilter,
    detect_scale: u32,
    beacon: BeaconLocator,
    tracker: DartTracker,
}

impl DartPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            dart_range: config.dart_range,
            dart_filter: CandidateFilter {
                area: config.dart_area,
                max_aspect_ratio: config.max_aspect_ratio,
            },
            detect_scale: config.detect_scale.max(1),
            beacon: BeaconLocator::new(config.beacon_range, config.beacon_area),
            tracker: DartTracker::new(config.tracker),
        }
    }

    /// Create a pipeline with the default configuration.
    pub fn with_default_config() -> Self {
        Self::new(PipelineConfig::default())
    }

    /// Process one frame and report detections and trajectory updates.
    ///
    /// Fails only on a zero-area frame; every other condition (no beacon,
    /// no candidates, capped tracker) degrades to "skip this frame's
    /// contribution" inside the report.
    pub fn process_frame(&mut self, frame: &RgbImage) -> Result<FrameReport, PipelineError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(VisionError::InvalidFrame {
                width: frame.width(),
                height: frame.height(),
            }
            .into());
        }

        let scale = self.detect_scale;
        let working = if scale > 1 {
            imageops::resize(
                frame,
                (frame.width() / scale).max(1),
                (frame.height() / scale).max(1),
                imageops::FilterType::Triangle,
            )
        } else {
            frame.clone()
        };
        let scale = scale as f32;

        // One HSV conversion per cycle, shared by both color passes.
        let hsv = to_hsv(&working)?;

        let beacon: BeaconState = *self.beacon.locate(&hsv, scale);

        // The dart pass runs whether or not the beacon is visible this
        // frame; only the landing reference falls back to the cache.
        let dart_mask = clean_mask(&mask_in_range(&hsv, &self.dart_range));
        let candidates = extract_candidates(&dart_mask, scale, &self.dart_filter);
        debug!(
            candidates = candidates.accepted.len(),
            rejected = candidates.rejected_shape.len(),
            beacon_visible = beacon.is_visible(),
            "frame processed"
        );

        let event = self
            .tracker
            .update(candidates.primary().map(|c| c.center), &beacon);

        Ok(FrameReport {
            beacon_visible: beacon.is_visible(),
            beacon_position: beacon.current,
            beacon_reference: beacon.reference(),
            candidates: candidates.accepted,
            rejected_candidates: candidates.rejected_shape,
            phase: self.tracker.phase(),
            active_trajectory: self.tracker.active_trajectory(),
            completed_tracks: self.tracker.completed_tracks().to_vec(),
            event,
        })
    }

    /// Manual reset command from the external collaborator (e.g. an
    /// operator keypress). Always safe to apply between frames; the
    /// beacon cache survives, being a property of the scene rather than
    /// of the session's darts.
    pub fn reset(&mut self, clear_origin: bool) {
        self.tracker.reset(clear_origin);
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &DartTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut DartTracker {
        &mut self.tracker
    }

    /// The beacon visibility cache.
    pub fn beacon_state(&self) -> &BeaconState {
        self.beacon.state()
    }
}
