//! Animated GIF countdown timers.
//!
//! A request names a target instant and a few visual options. The generator resolves how long
//! is left, renders one frame per second of countdown on the CPU and streams the frames into a
//! looping GIF:
//!
//! - Describe the countdown with a [`GenerationRequest`]
//! - Build a [`CountdownGenerator`] from [`GeneratorSettings`]
//! - Call [`CountdownGenerator::generate`] (or `generate_async` inside Tokio), or drive any
//!   [`FrameSink`] with [`CountdownGenerator::render_into`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod generate;
mod render;
mod time;

pub use crate::foundation::core::{
    Canvas, FrameIndex, MAX_CANVAS_PX, MAX_FRAMES, MIN_CANVAS_PX, MIN_FRAMES, clamp,
};
pub use crate::foundation::error::{CountdownError, CountdownResult};

pub use crate::assets::color::Rgba8;
pub use crate::assets::decode::{PreparedImage, decode_background};
pub use crate::assets::font::{FontSource, ResolvedFont, resolve_font};
pub use crate::encode::gif::{GifRepeat, GifSettings, GifSink, GifSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::generate::generator::{CountdownGenerator, GeneratedGif, load_background};
pub use crate::generate::request::{GenerationConfig, GenerationRequest};
pub use crate::generate::service::OutputLocks;
pub use crate::generate::settings::{ENV_FONT, ENV_OUT_DIR, GeneratorSettings};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::FrameRenderer;
pub use crate::render::style::{FrameStyle, font_size_for_width};
pub use crate::time::clock::{Clock, FixedClock, SystemClock};
pub use crate::time::duration::{Countdown, CountdownParts};
pub use crate::time::resolver::{
    EXPIRED_MESSAGE, FrameLabels, TimeState, parse_target_time, resolve_instant, resolve_time,
};
