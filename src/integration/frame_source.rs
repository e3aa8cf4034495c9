//! Pull-based frame acquisition boundary.

use std::fmt;

use image::RgbImage;

use crate::integration::pipeline::{DartPipeline, FrameReport, PipelineConfig, PipelineError};

/// Trait for external frame suppliers (cameras, video decoders, tests).
///
/// The core never blocks inside a detection cycle; any waiting happens
/// here, at the acquisition boundary, and implementations are expected to
/// bound it (e.g. a capture timeout) rather than park forever.
///
/// # Example
///
/// ```ignore
/// use darttrack_rs::FrameSource;
/// use image::RgbImage;
///
/// struct ReplaySource {
///     frames: std::vec::IntoIter<RgbImage>,
/// }
///
/// impl FrameSource for ReplaySource {
///     type Error = std::convert::Infallible;
///
///     fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error> {
///         Ok(self.frames.next())
///     }
/// }
/// ```
pub trait FrameSource {
    /// Error type for acquisition failures.
    type Error;

    /// Pull the next decoded frame.
    ///
    /// `Ok(None)` means the source is exhausted (end of stream); a timed
    /// out capture attempt should surface as the implementation's error
    /// type, not as `None`.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error>;
}

/// Error from driving a [`TrackingSession`].
#[derive(Debug)]
pub enum SessionError<E> {
    /// The frame source failed to produce a frame.
    Source(E),
    /// The pipeline rejected the frame.
    Pipeline(PipelineError),
}

impl<E: fmt::Display> fmt::Display for SessionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "frame source error: {}", e),
            Self::Pipeline(e) => write!(f, "pipeline error: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for SessionError<E> {}

impl<E> From<PipelineError> for SessionError<E> {
    fn from(err: PipelineError) -> Self {
        Self::Pipeline(err)
    }
}

/// A detection session bundling a frame source with the pipeline.
pub struct TrackingSession<S: FrameSource> {
    source: S,
    pipeline: DartPipeline,
}

impl<S: FrameSource> TrackingSession<S> {
    /// Create a new session with the given source and pipeline config.
    pub fn new(source: S, config: PipelineConfig) -> Self {
        Self {
            source,
            pipeline: DartPipeline::new(config),
        }
    }

    /// Create a new session with the default pipeline configuration.
    pub fn with_default_config(source: S) -> Self {
        Self::new(source, PipelineConfig::default())
    }

    /// Pull one frame and run one detection cycle.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    pub fn advance(&mut self) -> Result<Option<FrameReport>, SessionError<S::Error>> {
        let Some(frame) = self.source.next_frame().map_err(SessionError::Source)? else {
            return Ok(None);
        };
        Ok(Some(self.pipeline.process_frame(&frame)?))
    }

    /// Get a reference to the underlying pipeline.
    pub fn pipeline(&self) -> &DartPipeline {
        &self.pipeline
    }

    /// Get a mutable reference to the underlying pipeline (e.g. for the
    /// manual reset command between frames).
    pub fn pipeline_mut(&mut self) -> &mut DartPipeline {
        &mut self.pipeline
    }

    /// Get a mutable reference to the underlying frame source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReplaySource {
        frames: std::vec::IntoIter<RgbImage>,
    }

    impl FrameSource for ReplaySource {
        type Error = std::convert::Infallible;

        fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error> {
            Ok(self.frames.next())
        }
    }

    #[test]
    fn test_session_drains_source_then_ends() {
        let source = ReplaySource {
            frames: vec![RgbImage::new(32, 32), RgbImage::new(32, 32)].into_iter(),
        };
        let mut session = TrackingSession::with_default_config(source);

        assert!(session.advance().unwrap().is_some());
        assert!(session.advance().unwrap().is_some());
        assert!(session.advance().unwrap().is_none());
    }
}
