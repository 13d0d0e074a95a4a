use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::render::backend::FrameRGBA;

/// How many times the animation plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GifRepeat {
    /// Loop forever.
    #[default]
    Infinite,
    /// Play `n` extra times after the first pass.
    Finite(u16),
}

/// Animated GIF output parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSettings {
    /// Looping behavior.
    pub repeat: GifRepeat,
    /// Per-frame display time in milliseconds (stored in 10 ms units).
    pub delay_ms: u32,
    /// Palette quantization sample factor, `1..=30`. Lower is slower and more accurate.
    pub quality: i32,
}

impl Default for GifSettings {
    fn default() -> Self {
        Self {
            repeat: GifRepeat::Infinite,
            delay_ms: 1000,
            quality: 10,
        }
    }
}

impl GifSettings {
    fn delay_centis(&self) -> CountdownResult<u16> {
        u16::try_from(self.delay_ms / 10)
            .map_err(|_| CountdownError::validation("gif frame delay exceeds 655350 ms"))
    }

    fn validate(&self) -> CountdownResult<()> {
        if !(1..=30).contains(&self.quality) {
            return Err(CountdownError::validation("gif quality must be in 1..=30"));
        }
        self.delay_centis().map(|_| ())
    }
}

/// Options for [`GifSink`].
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output `.gif` path. Missing parent directories are created; an existing file is replaced.
    pub out_path: PathBuf,
    /// Encoding parameters.
    pub settings: GifSettings,
}

impl GifSinkOpts {
    /// Options writing to `out_path` with default settings.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            settings: GifSettings::default(),
        }
    }
}

/// Sink that streams frames into an animated GIF file.
///
/// The destination is opened in `begin`. `end` writes the trailer and flushes; only an `Ok` from
/// `end` means the file is complete.
pub struct GifSink {
    opts: GifSinkOpts,
    encoder: Option<::gif::Encoder<BufWriter<File>>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u32,
    bytes_written: Option<u64>,
    scratch: Vec<u8>,
}

impl GifSink {
    /// Create a sink; nothing touches the filesystem until `begin`.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
            frames_written: 0,
            bytes_written: None,
            scratch: Vec::new(),
        }
    }

    /// Output path.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    /// Frames encoded so far.
    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Size of the finished file, available after a successful `end`.
    pub fn bytes_written(&self) -> Option<u64> {
        self.bytes_written
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()> {
        if self.encoder.is_some() {
            return Err(CountdownError::encode("gif sink already started"));
        }
        self.opts.settings.validate()?;
        let w: u16 = cfg
            .width
            .try_into()
            .map_err(|_| CountdownError::validation("gif width exceeds u16"))?;
        let h: u16 = cfg
            .height
            .try_into()
            .map_err(|_| CountdownError::validation("gif height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(CountdownError::validation(
                "gif sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        let file = File::create(&self.opts.out_path).map_err(|e| {
            CountdownError::encode(format!(
                "open output '{}': {e}",
                self.opts.out_path.display()
            ))
        })?;

        let mut encoder = ::gif::Encoder::new(BufWriter::new(file), w, h, &[])
            .map_err(|e| CountdownError::encode(format!("write gif header: {e}")))?;
        let repeat = match self.opts.settings.repeat {
            GifRepeat::Infinite => ::gif::Repeat::Infinite,
            GifRepeat::Finite(n) => ::gif::Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| CountdownError::encode(format!("write gif loop extension: {e}")))?;

        tracing::debug!(
            path = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            frames = cfg.frame_count,
            "gif sink started"
        );

        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        self.bytes_written = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CountdownResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| CountdownError::encode("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(CountdownError::encode(
                "gif sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(CountdownError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
            return Err(CountdownError::encode(
                "frame.data size mismatch with width*height*4",
            ));
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(CountdownError::encode("gif sink is already finalized"));
        };
        self.last_idx = Some(idx);

        // Quantization rewrites the buffer in place.
        self.scratch.clear();
        self.scratch.extend_from_slice(&frame.data);
        let mut gif_frame = ::gif::Frame::from_rgba_speed(
            cfg.width as u16,
            cfg.height as u16,
            &mut self.scratch,
            self.opts.settings.quality,
        );
        gif_frame.delay = self.opts.settings.delay_centis()?;

        encoder
            .write_frame(&gif_frame)
            .map_err(|e| CountdownError::encode(format!("write gif frame {}: {e}", idx.0)))?;
        self.frames_written += 1;
        tracing::trace!(frame = idx.0, "gif frame written");
        Ok(())
    }

    fn end(&mut self) -> CountdownResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| CountdownError::encode("gif sink not started"))?;
        self.cfg = None;

        let writer = encoder
            .into_inner()
            .map_err(|e| CountdownError::encode(format!("write gif trailer: {e}")))?;
        let file = writer
            .into_inner()
            .map_err(|e| CountdownError::encode(format!("flush gif output: {}", e.error())))?;
        let len = file
            .metadata()
            .map_err(|e| CountdownError::encode(format!("stat gif output: {e}")))?
            .len();

        self.bytes_written = Some(len);
        tracing::debug!(
            path = %self.opts.out_path.display(),
            frames = self.frames_written,
            bytes = len,
            "gif sink finished"
        );
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> CountdownResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CountdownError::encode(format!(
                "create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
