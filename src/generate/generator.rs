use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_background};
use crate::assets::font::{ResolvedFont, resolve_font};
use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::generate::request::{GenerationConfig, GenerationRequest};
use crate::generate::settings::GeneratorSettings;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::FrameRenderer;
use crate::render::style::FrameStyle;
use crate::time::clock::{Clock, SystemClock};
use crate::time::resolver::{TimeState, resolve_instant};

/// Summary of a finished generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedGif {
    /// Where the GIF was written.
    pub path: PathBuf,
    /// Number of frames in the file.
    pub frames: u32,
    /// Countdown state the frames were rendered from.
    pub state: TimeState,
    /// Size of the file in bytes.
    pub bytes: u64,
}

/// Countdown GIF generator.
///
/// Holds process-level settings, the resolved font and the clock. It carries no per-request
/// state, so one generator can serve concurrent requests (`Send + Sync`).
#[derive(Clone)]
pub struct CountdownGenerator {
    settings: GeneratorSettings,
    font: Option<ResolvedFont>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CountdownGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownGenerator")
            .field("settings", &self.settings)
            .field("font", &self.font.as_ref().map(|f| f.family.as_str()))
            .finish_non_exhaustive()
    }
}

impl CountdownGenerator {
    /// Build a generator, resolving the configured font once.
    ///
    /// Fails only when an explicit font file cannot be used. With no system fonts installed,
    /// frames are rendered without text.
    pub fn new(settings: GeneratorSettings) -> CountdownResult<Self> {
        let font = resolve_font(&settings.font)?;
        Ok(Self {
            settings,
            font,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used to resolve "now".
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Settings this generator was built with.
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Family name of the countdown font, if one was found.
    pub fn font_family(&self) -> Option<&str> {
        self.font.as_ref().map(|f| f.family.as_str())
    }

    /// Destination of the GIF for `config`.
    pub fn output_path(&self, config: &GenerationConfig) -> PathBuf {
        self.settings.output_dir.join(config.file_name())
    }

    /// Generate a countdown GIF and write it to the output directory.
    ///
    /// The target time is validated and the background image loaded before anything is
    /// written, so time and asset errors never leave a file behind. An existing file with the
    /// same name is replaced.
    pub fn generate(&self, request: &GenerationRequest) -> CountdownResult<GeneratedGif> {
        let config = request.resolve()?;
        let background = match &config.background_image {
            Some(path) => Some(load_background(path, config.canvas)?),
            None => None,
        };
        self.write_gif(&config, background.as_ref())
    }

    /// Render `config` into a GIF at [`output_path`](Self::output_path).
    #[tracing::instrument(skip_all, fields(name = %config.name, frames = config.frames))]
    pub fn write_gif(
        &self,
        config: &GenerationConfig,
        background: Option<&PreparedImage>,
    ) -> CountdownResult<GeneratedGif> {
        let path = self.output_path(config);
        let mut sink = GifSink::new(GifSinkOpts::new(&path));
        let state = self.render_into(config, background, &mut sink)?;
        let bytes = sink
            .bytes_written()
            .ok_or_else(|| CountdownError::encode("gif sink finished without a size"))?;

        tracing::info!(
            path = %path.display(),
            frames = sink.frames_written(),
            bytes,
            expired = state.is_expired(),
            "countdown gif written"
        );
        Ok(GeneratedGif {
            path,
            frames: sink.frames_written(),
            state,
            bytes,
        })
    }

    /// Resolve the countdown against the clock and stream every frame into `sink`.
    ///
    /// Returns the state the frames were rendered from. `sink` sees `begin`, one `push_frame`
    /// per frame and `end`, in that order.
    #[tracing::instrument(skip_all, fields(target = %config.target))]
    pub fn render_into<S>(
        &self,
        config: &GenerationConfig,
        background: Option<&PreparedImage>,
        sink: &mut S,
    ) -> CountdownResult<TimeState>
    where
        S: FrameSink + ?Sized,
    {
        let mut renderer = self.renderer_for(config, background)?;
        let state = resolve_instant(config.target, self.clock.now());
        let frame_count = state.frame_count(config.frames);
        tracing::debug!(expired = state.is_expired(), frame_count, "countdown resolved");

        sink.begin(SinkConfig {
            width: config.canvas.width,
            height: config.canvas.height,
            frame_count,
        })?;
        for (i, label) in state.labels(config.frames).enumerate() {
            let frame = renderer.render(&label)?;
            sink.push_frame(FrameIndex(i as u64), &frame)?;
            tracing::debug!(frame = i, label = %label, "frame rendered");
        }
        sink.end()?;
        Ok(state)
    }

    /// Render only the first frame of `request`.
    pub fn preview(&self, request: &GenerationRequest) -> CountdownResult<FrameRGBA> {
        let config = request.resolve()?;
        let background = match &config.background_image {
            Some(path) => Some(load_background(path, config.canvas)?),
            None => None,
        };
        let mut renderer = self.renderer_for(&config, background.as_ref())?;
        let state = resolve_instant(config.target, self.clock.now());
        let label = state
            .labels(config.frames)
            .next()
            .ok_or_else(|| CountdownError::render("countdown produced no frames"))?;
        renderer.render(&label)
    }

    fn renderer_for(
        &self,
        config: &GenerationConfig,
        background: Option<&PreparedImage>,
    ) -> CountdownResult<FrameRenderer> {
        let style = FrameStyle::new(config.canvas, config.background, config.text_color);
        FrameRenderer::new(style, background, self.font.as_ref())
    }
}

/// Read and decode a background image from disk, scaled to `canvas`.
pub fn load_background(path: &Path, canvas: Canvas) -> CountdownResult<PreparedImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        CountdownError::asset(format!("read background image '{}': {e}", path.display()))
    })?;
    decode_background(&bytes, canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/generator.rs"]
mod tests;
