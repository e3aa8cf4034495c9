//! Boundary between the detection core and its external collaborators.
//!
//! The core consumes one decoded frame per cycle and produces a
//! structured [`FrameReport`]; camera acquisition, rendering, and
//! persistence live on the other side of the traits and types here.

mod config;
mod frame_source;
mod pipeline;

pub use config::{ConfigError, SESSION_CONFIG_VERSION, SessionConfig};
pub use frame_source::{FrameSource, SessionError, TrackingSession};
pub use pipeline::{DartPipeline, FrameReport, PipelineConfig, PipelineError};
