use serde::{Deserialize, Serialize};

use crate::vision::Rect;

/// Spatial predicate that starts trajectory recording.
///
/// Either variant declares a dart "entered" when the primary candidate's
/// center satisfies it. The tracker evaluates it only while idle, so the
/// trigger fires at most once per tracking cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntryTrigger {
    /// Fires when the center lies inside the rectangle (edges inclusive).
    Zone(Rect),
    /// Fires when the center is within `radius` of `center`. A cleared
    /// origin (`None`) never fires until a new origin is configured.
    Radius {
        center: Option<(f32, f32)>,
        radius: f32,
    },
}

impl EntryTrigger {
    /// Default entry region: the top half of a 640x480 frame.
    pub fn upper_half_zone() -> Self {
        Self::Zone(Rect::new(0.0, 0.0, 640.0, 240.0))
    }

    /// Whether the point satisfies the predicate.
    pub fn matches(&self, point: (f32, f32)) -> bool {
        match self {
            Self::Zone(rect) => rect.contains(point),
            Self::Radius { center, radius } => center.is_some_and(|(cx, cy)| {
                let dx = point.0 - cx;
                let dy = point.1 - cy;
                dx * dx + dy * dy <= radius * radius
            }),
        }
    }

    /// Clear the configured origin of a radius trigger; zone triggers are
    /// unaffected. Used by the manual reset command.
    pub fn clear_origin(&mut self) {
        if let Self::Radius { center, .. } = self {
            *center = None;
        }
    }
}
