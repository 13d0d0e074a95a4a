use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: u32,
}

/// Sink contract for consuming rendered frames in display order.
///
/// Ordering contract: `begin` once, then `push_frame` with strictly increasing `FrameIndex`,
/// then `end` once. `end` returning `Ok` means the output is complete.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()>;
    /// Push one frame in strictly increasing display order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CountdownResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> CountdownResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in display order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Take the captured frames, dropping their indices.
    pub fn into_frames(self) -> Vec<FrameRGBA> {
        self.frames.into_iter().map(|(_, f)| f).collect()
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CountdownResult<()> {
        if self.cfg.is_none() || self.finished {
            return Err(CountdownError::encode("in-memory sink is not accepting frames"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(CountdownError::encode(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CountdownResult<()> {
        if self.cfg.is_none() || self.finished {
            return Err(CountdownError::encode("in-memory sink not started"));
        }
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
