//! Session-state components: beacon cache, entry trigger, and the
//! trajectory state machine.
//!
//! All state here is owned by the calling frame loop and mutated once per
//! frame; nothing in this module touches pixels.

mod beacon;
mod dart_tracker;
mod phase;
mod trajectory;
mod trigger;

pub use beacon::{BeaconLocator, BeaconState};
pub use dart_tracker::{DartTracker, TrackEvent, TrackerConfig};
pub use phase::TrackPhase;
pub use trajectory::{CompletedTrack, Trajectory};
pub use trigger::EntryTrigger;
