use std::collections::VecDeque;

use serde::Serialize;

/// Ordered, time-sequenced path of the object currently in flight.
///
/// Bounded to `max_len` points with ring semantics: once the bound is
/// exceeded the oldest point is dropped, never an error.
#[derive(Debug, Clone)]
pub struct Trajectory {
    points: VecDeque<(f32, f32)>,
    max_len: usize,
}

impl Trajectory {
    pub fn new(max_len: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_len.min(1024)),
            max_len,
        }
    }

    /// Append a point, evicting the oldest one if the bound is exceeded.
    pub fn push(&mut self, point: (f32, f32)) {
        if self.points.len() >= self.max_len {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Drop all points and seed with the triggering point.
    pub fn restart_with(&mut self, point: (f32, f32)) {
        self.points.clear();
        self.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<(f32, f32)> {
        self.points.back().copied()
    }

    /// Snapshot of the current path, oldest point first.
    pub fn points(&self) -> Vec<(f32, f32)> {
        self.points.iter().copied().collect()
    }

    /// Freeze the trajectory into a completed track, leaving it empty.
    pub fn finalize(&mut self, landing_point: (f32, f32)) -> CompletedTrack {
        CompletedTrack {
            points: self.points.drain(..).collect(),
            landing_point,
        }
    }
}

/// Immutable snapshot of one finished trajectory and where it landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedTrack {
    /// The trajectory at finalize time, oldest point first.
    pub points: Vec<(f32, f32)>,
    /// The point that satisfied the landing condition.
    pub landing_point: (f32, f32),
}
