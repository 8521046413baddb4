use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "thumbcraft", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a text overlay onto a background and write a PNG.
    Compose(ComposeArgs),
    /// Print the computed line/word geometry as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct StyleArgs {
    /// Text options JSON. Defaults are used when omitted.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Override the overlay text.
    #[arg(long)]
    text: Option<String>,

    /// Apply a style preset on top of the options.
    #[arg(long, value_enum)]
    preset: Option<PresetChoice>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background image (PNG, JPEG or WebP).
    #[arg(long)]
    background: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font directory. Overrides `THUMBCRAFT_FONTS_DIR`.
    #[arg(long)]
    fonts: Option<PathBuf>,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Measure with real fonts from this directory instead of a fixed advance.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Per-character advance (in em) used when no font directory is given.
    #[arg(long, default_value_t = 0.5)]
    advance_em: f64,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    News,
    Bold,
    Documentary,
}

impl From<PresetChoice> for thumbcraft::StylePreset {
    fn from(p: PresetChoice) -> Self {
        match p {
            PresetChoice::News => thumbcraft::StylePreset::News,
            PresetChoice::Bold => thumbcraft::StylePreset::Bold,
            PresetChoice::Documentary => thumbcraft::StylePreset::Documentary,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn read_options(args: &StyleArgs) -> anyhow::Result<thumbcraft::TextOptions> {
    let mut options = match &args.options {
        Some(path) => thumbcraft::TextOptions::from_path(path)?,
        None => thumbcraft::TextOptions::default(),
    };
    if let Some(text) = &args.text {
        options.text = text.clone();
    }
    if let Some(preset) = args.preset {
        options = thumbcraft::StylePreset::from(preset).apply(&options);
    }
    options.validate()?;
    Ok(options)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut config = thumbcraft::PipelineConfig::from_env();
    if let Some(dir) = args.fonts {
        config.fonts_dir = dir;
    }
    let options = read_options(&args.style)?;
    let background = thumbcraft::EncodedImage::from_path(&args.background)?;

    let out = if options.is_blank() {
        background
    } else {
        let fonts = thumbcraft::FontLibrary::load_dir(&config.fonts_dir)
            .with_context(|| format!("load fonts from '{}'", config.fonts_dir.display()))?;
        let compositor = thumbcraft::CpuCompositor::new(config.canvas, Arc::new(fonts))?;
        thumbcraft::Compositor::composite(&compositor, &background, &options)?
    };

    out.save(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let options = read_options(&args.style)?;
    let canvas = thumbcraft::Canvas::THUMBNAIL;

    let layout = match &args.fonts {
        Some(dir) => {
            let lib = thumbcraft::FontLibrary::load_dir(dir)?;
            let mut book = thumbcraft::FontBook::from_library(&lib)?;
            thumbcraft::layout_text(canvas, &options, &mut book)
        }
        None => {
            let mut measurer = thumbcraft::FixedAdvanceMeasurer::new(args.advance_em);
            thumbcraft::layout_text(canvas, &options, &mut measurer)
        }
    };

    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}
