//! cellfont — render text with a bitmap font atlas to a PNG.
//!
//! Usage:
//!   # Built-in 8×16 font
//!   cellfont "Hello, world" --out hello.png
//!
//!   # Custom 16×16-cell atlas with spacing
//!   cellfont "Score: 100" --font atlas.png --char-spacing 1 --line-spacing 2
//!
//!   # Only print the measured size
//!   cellfont "two\nlines" --measure-only

mod config;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use cellfont_image::{save_buffer_png, ImageError, LoadError};
use cellfont_text::{GlyphAtlas, TextCompositor};
use clap::Parser;
use log::{error, info};
use thiserror::Error;

use config::{ConfigError, RenderConfig};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to load font: {0}")]
    Font(#[from] LoadError),
    #[error("Failed to write PNG: {0}")]
    Save(#[from] ImageError),
    #[error("Nothing to render: measured size is {width}x{height}")]
    Empty { width: u32, height: u32 },
}

/// Render text with a 16×16-cell bitmap font.
#[derive(Parser, Debug)]
#[command(name = "cellfont")]
#[command(about = "Render text with a bitmap font atlas")]
struct Args {
    /// Text to render; `\n` starts a new line
    text: String,

    /// Font atlas image (defaults to the embedded font)
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "out.png")]
    out: PathBuf,

    /// JSON render config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra pixels after each character
    #[arg(long, allow_hyphen_values = true)]
    char_spacing: Option<i32>,

    /// Extra pixels after each line
    #[arg(long, allow_hyphen_values = true)]
    line_spacing: Option<i32>,

    /// Blank border in pixels
    #[arg(long)]
    padding: Option<u32>,

    /// Print the measured size and exit
    #[arg(long)]
    measure_only: bool,
}

impl Args {
    /// Overlay command-line values on `cfg`.
    fn apply(&self, mut cfg: RenderConfig) -> RenderConfig {
        if let Some(font) = &self.font {
            cfg.font = Some(font.clone());
        }
        if let Some(n) = self.char_spacing {
            cfg.spacing.char_spacing = n;
        }
        if let Some(n) = self.line_spacing {
            cfg.spacing.line_spacing = n;
        }
        if let Some(p) = self.padding {
            cfg.padding = p;
        }
        cfg
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let base = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let cfg = args.apply(base);

    let atlas = match &cfg.font {
        Some(path) => GlyphAtlas::from_file(path)?,
        None => GlyphAtlas::embedded(),
    };
    let tc = TextCompositor::with_spacing(atlas, cfg.spacing);
    let text = args.text.replace("\\n", "\n");

    if args.measure_only {
        let m = tc.measure(&text);
        println!("{} {}", m.width, m.height);
        return Ok(());
    }

    let out = render::render(&tc, &text, cfg.background, cfg.padding);
    if out.width == 0 || out.height == 0 {
        return Err(CliError::Empty {
            width: out.width,
            height: out.height,
        });
    }
    save_buffer_png(&args.out, &out.pixels, out.width, out.height)?;
    info!(
        "Wrote {}x{} image to {}",
        out.width,
        out.height,
        args.out.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
