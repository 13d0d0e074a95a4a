use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use countdown_gif::{
    CountdownGenerator, FixedClock, FontSource, GenerationRequest, GeneratorSettings,
    parse_target_time,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "countdown-gif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a countdown GIF into the output directory.
    Render(RequestArgs),
    /// Render only the first frame as a PNG.
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Target instant (RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM[:SS]` in UTC, or `YYYY-MM-DD`).
    #[arg(long)]
    time: Option<String>,

    /// Canvas width in pixels, clamped to 150..=500.
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i64>,

    /// Canvas height in pixels, clamped to 150..=500.
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Text color, hex triplet.
    #[arg(long)]
    color: Option<String>,

    /// Background color, hex triplet.
    #[arg(long)]
    bg: Option<String>,

    /// Output file stem.
    #[arg(long)]
    name: Option<String>,

    /// Image drawn over the background color.
    #[arg(long)]
    background_image: Option<PathBuf>,

    /// Frame count, clamped to 1..=90.
    #[arg(long, allow_negative_numbers = true)]
    frames: Option<i64>,

    /// JSON request document; individual flags override its fields.
    #[arg(long)]
    request: Option<PathBuf>,

    /// Freeze "now" at this instant for reproducible output.
    #[arg(long)]
    now: Option<String>,

    /// Output directory (overrides COUNTDOWN_GIF_OUT_DIR).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Font file (overrides COUNTDOWN_GIF_FONT).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn cmd_render(args: RequestArgs) -> anyhow::Result<()> {
    let request = build_request(&args)?;
    let generator = build_generator(&args)?;
    let out = generator.generate(&request)?;

    println!("{}", out.path.display());
    eprintln!(
        "wrote {} frame(s), {} bytes{}",
        out.frames,
        out.bytes,
        if out.state.is_expired() { " (expired)" } else { "" }
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let request = build_request(&args.request)?;
    let generator = build_generator(&args.request)?;
    let frame = generator.preview(&request)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    frame
        .to_rgba_image()
        .context("frame buffer does not match its dimensions")?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn build_request(args: &RequestArgs) -> anyhow::Result<GenerationRequest> {
    let mut req = match &args.request {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read request '{}'", path.display()))?;
            GenerationRequest::from_json(&json)?
        }
        None => GenerationRequest::default(),
    };

    if let Some(v) = &args.time {
        req.time = Some(v.clone());
    }
    if let Some(v) = args.width {
        req.width = Some(v);
    }
    if let Some(v) = args.height {
        req.height = Some(v);
    }
    if let Some(v) = &args.color {
        req.color = Some(v.clone());
    }
    if let Some(v) = &args.bg {
        req.bg = Some(v.clone());
    }
    if let Some(v) = &args.name {
        req.name = Some(v.clone());
    }
    if let Some(v) = &args.background_image {
        req.background_image = Some(v.clone());
    }
    if let Some(v) = args.frames {
        req.frames = Some(v);
    }
    Ok(req)
}

fn build_generator(args: &RequestArgs) -> anyhow::Result<CountdownGenerator> {
    let mut settings = GeneratorSettings::from_env();
    if let Some(dir) = &args.out_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(font) = &args.font {
        settings.font = FontSource::File(font.clone());
    }

    let generator = CountdownGenerator::new(settings)?;
    tracing::info!(
        font = generator.font_family().unwrap_or("<none>"),
        out_dir = %generator.settings().output_dir.display(),
        "generator ready"
    );
    Ok(match &args.now {
        Some(now) => generator.with_clock(FixedClock::new(
            parse_target_time(now).context("parse --now")?,
        )),
        None => generator,
    })
}
