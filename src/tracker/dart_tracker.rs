//! The trajectory state machine: entry trigger, point accumulation,
//! landing detection, and the completed-track cap.

use serde::Serialize;
use tracing::{info, warn};

use crate::tracker::beacon::BeaconState;
use crate::tracker::phase::TrackPhase;
use crate::tracker::trajectory::{CompletedTrack, Trajectory};
use crate::tracker::trigger::EntryTrigger;

/// Configuration for the [`DartTracker`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Spatial predicate that arms a new trajectory.
    pub trigger: EntryTrigger,
    /// Completed-track cap; the trigger disarms once it is reached.
    pub max_tracked_objects: usize,
    /// Landing proximity to the beacon reference row, in pixels.
    pub landing_threshold: f32,
    /// Ring bound for the active trajectory.
    pub max_trajectory_len: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            trigger: EntryTrigger::upper_half_zone(),
            max_tracked_objects: 4,
            landing_threshold: 20.0,
            max_trajectory_len: 100,
        }
    }
}

/// Transition reported by one tracker update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TrackEvent {
    /// The entry trigger fired; a new trajectory started at `point`.
    TrackingStarted { point: (f32, f32) },
    /// The active trajectory reached the landing line and was finalized.
    Landed {
        landing_point: (f32, f32),
        /// Completed-track count after this landing.
        completed: usize,
    },
}

/// Bounded multi-object trajectory tracker.
///
/// At most one trajectory is active at a time; each completed trajectory
/// occupies one of `max_tracked_objects` slots. Updated exactly once per
/// frame by the owning frame loop.
#[derive(Debug, Clone)]
pub struct DartTracker {
    config: TrackerConfig,
    phase: TrackPhase,
    active: Trajectory,
    completed: Vec<CompletedTrack>,
}

impl DartTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let active = Trajectory::new(config.max_trajectory_len);
        Self {
            config,
            phase: TrackPhase::Idle,
            active,
            completed: Vec::new(),
        }
    }

    pub fn phase(&self) -> TrackPhase {
        self.phase
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Snapshot of the active trajectory, oldest point first.
    pub fn active_trajectory(&self) -> Vec<(f32, f32)> {
        self.active.points()
    }

    pub fn completed_tracks(&self) -> &[CompletedTrack] {
        &self.completed
    }

    /// Advance the state machine by one frame.
    ///
    /// `candidate` is the primary dart candidate's center for this frame,
    /// if any; a frame with no qualifying candidate is not an error and
    /// leaves the active trajectory untouched. The appended point is
    /// checked against the beacon reference row for the landing condition.
    pub fn update(
        &mut self,
        candidate: Option<(f32, f32)>,
        beacon: &BeaconState,
    ) -> Option<TrackEvent> {
        let center = candidate?;

        match self.phase {
            TrackPhase::Capped => None,
            TrackPhase::Idle => {
                if !self.config.trigger.matches(center) {
                    return None;
                }
                // The trigger frame only seeds: one append per frame.
                self.active.restart_with(center);
                self.phase = TrackPhase::Active;
                info!(point = ?center, "dart entered trigger region, tracking started");
                Some(TrackEvent::TrackingStarted { point: center })
            }
            TrackPhase::Active => {
                self.active.push(center);
                let Some((_, reference_y)) = beacon.reference() else {
                    // No landing detection is possible until the beacon has
                    // been seen once; the trajectory grows to its ring bound.
                    warn!(
                        trajectory_len = self.active.len(),
                        "tracking without a landing reference (beacon never seen)"
                    );
                    return None;
                };

                // Landing: at or below the reference row, within threshold.
                // Never finalizes while the object is still above the line.
                let dy = center.1 - reference_y;
                if dy < 0.0 || dy >= self.config.landing_threshold {
                    return None;
                }

                let track = self.active.finalize(center);
                self.completed.push(track);
                if self.completed.len() >= self.config.max_tracked_objects {
                    self.phase = TrackPhase::Capped;
                    info!(
                        completed = self.completed.len(),
                        "all tracked-object slots used"
                    );
                } else {
                    self.phase = TrackPhase::Idle;
                }
                info!(
                    landing = ?center,
                    reference_y,
                    cached = !beacon.is_visible(),
                    completed = self.completed.len(),
                    "trajectory finalized"
                );
                Some(TrackEvent::Landed {
                    landing_point: center,
                    completed: self.completed.len(),
                })
            }
        }
    }

    /// Manual reset command, accepted in any state: back to `Idle` with an
    /// empty trajectory and no completed tracks. With `clear_origin`, a
    /// radius trigger's configured origin is also dropped, leaving the
    /// trigger disarmed until a new origin is set.
    pub fn reset(&mut self, clear_origin: bool) {
        self.active.clear();
        self.completed.clear();
        self.phase = TrackPhase::Idle;
        if clear_origin {
            self.config.trigger.clear_origin();
        }
        info!(clear_origin, "tracker reset");
    }
}
