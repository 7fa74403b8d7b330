//! Command line front end: write a text file with the robot.
//!
//! Examples:
//!   robot-writer --height 6 notes.txt                 # print G-code to stdout
//!   robot-writer --height 6 --port /dev/ttyUSB0 notes.txt
//!   robot-writer --preview notes.svg notes.txt        # prompts for the height

use std::{
    fs::OpenOptions,
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use robot_writer::{
    EmitterConfig, GcodeWriter, LayoutConfig, LayoutEngine, SerialEmitter, StrokeFont, TextSource,
    drive, preview,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "robot-writer",
    version,
    about = "Write text with a pen-plotting robot",
    long_about = "Lays out a text file in a single-stroke font and streams it to the writing robot as G-code, waiting for the robot to acknowledge each command."
)]
struct CliArgs {
    /// Text file to write. Prompted for if omitted.
    text: Option<PathBuf>,

    /// Single-stroke font description
    #[clap(long, short = 'f', default_value = "SingleStrokeFont.txt")]
    font: PathBuf,

    /// Character height in millimetres (4-10). Prompted for if omitted.
    #[clap(long, short = 'H')]
    height: Option<f32>,

    /// Serial device of the robot. G-code is printed to stdout if omitted.
    #[clap(long, short = 'p')]
    port: Option<PathBuf>,

    /// Also write an SVG preview of the layout to this file
    #[clap(long)]
    preview: Option<PathBuf>,

    /// JSON file overriding the default layout settings
    #[clap(long)]
    config: Option<PathBuf>,

    /// Maximum line width in millimetres
    #[clap(long)]
    line_width: Option<f32>,

    /// Spacing added after each character
    #[clap(long)]
    char_spacing: Option<f32>,

    /// Spacing added after each word
    #[clap(long)]
    word_spacing: Option<f32>,

    /// Pause after each acknowledged command, in milliseconds
    #[clap(long, default_value_t = 100)]
    settle_ms: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => LayoutConfig::from_file(path)?,
        None => LayoutConfig::default(),
    };
    if let Some(width) = args.line_width {
        config.line_width_mm = width;
    }
    if let Some(spacing) = args.char_spacing {
        config.char_spacing_mm = spacing;
    }
    if let Some(spacing) = args.word_spacing {
        config.word_spacing_mm = spacing;
    }

    let height = match args.height {
        Some(height) => height,
        None => prompt("Enter the height for the characters (4-10 mm): ")?
            .parse()
            .context("character height must be a number")?,
    };
    let config = config.with_height(height)?;

    let font = StrokeFont::load(&args.font).context("failed to read font data")?;

    let text_path = match args.text {
        Some(path) => path,
        None => prompt("Enter the name of the text file to read: ")?.into(),
    };
    let text = TextSource::open(&text_path)?;

    let engine = LayoutEngine::new(&font, config);

    if let Some(path) = &args.preview {
        let commands: Vec<_> = engine.layout(text.words()).collect();
        preview::save(path, &commands)
            .with_context(|| format!("failed to write preview {}", path.display()))?;
        info!(path = %path.display(), "wrote preview");
    }

    let commands = engine.layout(text.words());

    let sent = match &args.port {
        Some(device) => {
            let port = OpenOptions::new()
                .read(true)
                .write(true)
                .open(device)
                .with_context(|| format!("unable to open serial port {}", device.display()))?;

            let mut emitter = SerialEmitter::new(
                port,
                EmitterConfig {
                    settle: Duration::from_millis(args.settle_ms),
                    ..EmitterConfig::default()
                },
            );
            emitter.wake()?;
            info!("robot is ready to draw");
            emitter.initialise()?;

            let sent = drive(commands, &mut emitter)?;
            info!(port = %device.display(), "closing serial port");
            sent
        }
        None => drive(commands, &mut GcodeWriter::new(io::stdout().lock()))?,
    };

    info!(commands = sent, "finished writing");
    Ok(())
}

/// Ask a question on stderr and read a single trimmed line from stdin.
fn prompt(question: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{question}")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_owned())
}
