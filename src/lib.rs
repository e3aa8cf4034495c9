//! Per-frame detection and trajectory tracking for fast colored objects
//! ("darts") relative to a fixed colored reference beacon.
//!
//! The crate is organized in three layers:
//! - [`vision`] — pure image processing: color segmentation, mask cleanup,
//!   contour candidate extraction.
//! - [`tracker`] — session state: beacon cache, entry trigger, and the
//!   trajectory state machine.
//! - [`integration`] — the per-frame pipeline and the boundary traits for
//!   external frame sources and persisted configuration.

pub mod integration;
pub mod tracker;
pub mod vision;

pub use integration::{
    ConfigError, DartPipeline, FrameReport, FrameSource, PipelineConfig, PipelineError,
    SessionConfig, SessionError, TrackingSession,
};
pub use tracker::{
    BeaconLocator, BeaconState, CompletedTrack, DartTracker, EntryTrigger, TrackEvent, TrackPhase,
    TrackerConfig, Trajectory,
};
pub use vision::{
    AreaBand, CandidateFilter, CandidateSet, ColorRange, DetectionCandidate, Hsv, Rect,
    VisionError,
};
