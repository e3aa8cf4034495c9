use serde::Serialize;

/// Tracker lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrackPhase {
    /// No active trajectory; the entry trigger is armed.
    #[default]
    Idle,
    /// Accumulating points for the object currently in flight.
    Active,
    /// All tracked-object slots are used; terminal until a manual reset.
    Capped,
}
