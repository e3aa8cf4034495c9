//! Versioned session configuration.
//!
//! The durable record an external collaborator persists between sessions:
//! the trigger predicate and the two color bands, stamped with the
//! resolution they were captured at so coordinates can be rescaled
//! exactly instead of guessed from a magnitude heuristic. File I/O stays
//! with the collaborator; this module only defines the schema and codec.

use serde::{Deserialize, Serialize};

use crate::integration::pipeline::PipelineConfig;
use crate::tracker::EntryTrigger;
use crate::vision::{AreaBand, ColorRange, Rect};

/// Current schema version.
pub const SESSION_CONFIG_VERSION: u32 = 1;

/// Error type for session-configuration decoding.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported session config version {found} (expected {SESSION_CONFIG_VERSION})")]
    UnsupportedVersion { found: u32 },
    #[error("session config carries a zero capture resolution")]
    ZeroResolution,
    #[error("malformed session config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted tuning record, tied to the resolution it was captured at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Schema version; decoding rejects anything but the current one.
    pub version: u32,
    /// `[width, height]` the coordinates below were captured at.
    pub resolution: [u32; 2],
    /// Entry trigger, including its configured origin.
    pub trigger: EntryTrigger,
    pub dart_range: ColorRange,
    pub dart_area: AreaBand,
    pub beacon_range: ColorRange,
    pub beacon_area: AreaBand,
}

impl SessionConfig {
    /// Capture the tunable parts of a pipeline configuration at the given
    /// resolution.
    pub fn capture(config: &PipelineConfig, width: u32, height: u32) -> Self {
        Self {
            version: SESSION_CONFIG_VERSION,
            resolution: [width, height],
            trigger: config.tracker.trigger,
            dart_range: config.dart_range,
            dart_area: config.dart_area,
            beacon_range: config.beacon_range,
            beacon_area: config.beacon_area,
        }
    }

    /// Decode from JSON, rejecting unknown versions and degenerate
    /// capture resolutions.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version != SESSION_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
            });
        }
        if config.resolution[0] == 0 || config.resolution[1] == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        Ok(config)
    }

    /// Encode to JSON for the persistence collaborator.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rescale the captured coordinates exactly to a new resolution.
    ///
    /// Color ranges and area bands are resolution-independent here (area
    /// bands are tuned in original-frame units at the new resolution by
    /// the operator, not derived), so only the trigger geometry moves.
    pub fn rescale_to(&self, width: u32, height: u32) -> Self {
        let sx = width as f32 / self.resolution[0] as f32;
        let sy = height as f32 / self.resolution[1] as f32;

        let trigger = match self.trigger {
            EntryTrigger::Zone(rect) => EntryTrigger::Zone(Rect::new(
                rect.x * sx,
                rect.y * sy,
                rect.width * sx,
                rect.height * sy,
            )),
            EntryTrigger::Radius { center, radius } => EntryTrigger::Radius {
                center: center.map(|(x, y)| (x * sx, y * sy)),
                radius: radius * (sx + sy) / 2.0,
            },
        };

        Self {
            resolution: [width, height],
            trigger,
            ..self.clone()
        }
    }

    /// Install the persisted values into a pipeline configuration.
    pub fn apply_to(&self, config: &mut PipelineConfig) {
        config.tracker.trigger = self.trigger;
        config.dart_range = self.dart_range;
        config.dart_area = self.dart_area;
        config.beacon_range = self.beacon_range;
        config.beacon_area = self.beacon_area;
    }
}
