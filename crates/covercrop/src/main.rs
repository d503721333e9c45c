//! covercrop: Crop or pad an image into a square cover from the command line.
//!
//! Decodes the input, sets up a crop session (centered for a new image, or
//! restored from `--crop` for one that was cropped before), applies any
//! resize and move requests, and writes the encoded square. The resulting
//! crop string is printed on stdout so it can be stored alongside the
//! image and passed back with `--crop` next time.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin covercrop -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use covercrop_export::{ExportConfig, OutputFormat, decode, export_session};
use covercrop_geometry::{CropEngine, Mode, Point, Source};
use log::LevelFilter;

/// Crop or pad an image into a square cover.
///
/// Prints the persistable crop string (`x1,y1,x2,y2`) on stdout; nothing
/// is printed in pad mode.
#[derive(Parser)]
#[command(name = "covercrop", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Output path. Defaults to `<stem>-square.<ext>` next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Previously stored crop string ("x1,y1,x2,y2").
    ///
    /// When given, the image is treated as an existing one being
    /// re-exported; otherwise the largest centered square is used.
    #[arg(long, value_name = "X1,Y1,X2,Y2")]
    crop: Option<String>,

    /// Output mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Crop)]
    mode: ModeArg,

    /// Resize the crop square to this side length, keeping its center.
    #[arg(long, value_name = "PIXELS")]
    resize: Option<f64>,

    /// Move the crop square by "DX,DY" natural pixels, as a drag would.
    #[arg(long, value_name = "DX,DY", allow_hyphen_values = true)]
    nudge: Option<String>,

    /// Maximum output side length in pixels.
    #[arg(long, default_value_t = ExportConfig::DEFAULT_MAX_OUTPUT_SIZE, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    max_size: u32,

    /// Lossy encoder quality (0-1].
    #[arg(long, default_value_t = ExportConfig::DEFAULT_QUALITY)]
    quality: f32,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Jpeg)]
    format: FormatArg,

    /// Full export config as a JSON string.
    ///
    /// When provided, `--max-size`, `--quality` and `--format` are ignored.
    /// The JSON must be a valid `ExportConfig` serialization; missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Output mode selection.
#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Keep only the crop square.
    Crop,
    /// Fit the whole image inside a square with white margins.
    Pad,
}

/// Output format selection.
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Lossy JPEG.
    Jpeg,
    /// Lossless PNG.
    Png,
}

/// Build an [`ExportConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<ExportConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        ExportConfig {
            max_output_size: cli.max_size,
            quality: cli.quality,
            format: match cli.format {
                FormatArg::Jpeg => OutputFormat::Jpeg,
                FormatArg::Png => OutputFormat::Png,
            },
            ..ExportConfig::default()
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Parse `--nudge "DX,DY"`.
fn parse_nudge(s: &str) -> Result<(f64, f64), String> {
    let (dx_str, dy_str) = s
        .split_once(',')
        .ok_or_else(|| format!("nudge must be 'DX,DY', got: '{s}'"))?;
    let dx: f64 = dx_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid nudge DX '{dx_str}': {e}"))?;
    let dy: f64 = dy_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid nudge DY '{dy_str}': {e}"))?;
    Ok((dx, dy))
}

/// Move the crop square by a delta the same way a pointer drag does:
/// grab it at its center and release it `delta` away.
fn nudge(engine: &mut CropEngine, (dx, dy): (f64, f64)) {
    let Some(region) = engine.region() else {
        log::warn!("no crop region to move");
        return;
    };
    let grab = region.center();
    if let Some(session) = engine.begin_drag(grab) {
        let moved = engine.update_drag(&session, Point::new(grab.x + dx, grab.y + dy));
        log::info!("moved crop to ({}, {})", moved.x, moved.y);
    }
}

/// Default output path: the suggested filename in the input's directory.
fn default_output(input: &Path, filename: &str) -> PathBuf {
    input
        .parent()
        .map_or_else(|| PathBuf::from(filename), |dir| dir.join(filename))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let delta = match cli.nudge.as_deref().map(parse_nudge).transpose() {
        Ok(d) => d,
        Err(msg) => {
            eprintln!("--nudge: {msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let source = match decode(&image_bytes) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Image: {} ({}x{}, {} bytes)",
        cli.image_path.display(),
        source.dimensions.width,
        source.dimensions.height,
        image_bytes.len(),
    );
    log::debug!("Config: {config:?}");

    let mode = match cli.mode {
        ModeArg::Crop => Mode::Crop,
        ModeArg::Pad => Mode::Pad,
    };
    let origin = if cli.crop.is_some() {
        Source::Existing
    } else {
        Source::New
    };
    let mut engine = CropEngine::initialize(source.dimensions, cli.crop.as_deref(), origin, mode);
    if origin == Source::Existing && engine.region().is_none() {
        log::warn!("ignoring unusable --crop value; exporting the centered square");
    }

    if let Some(size) = cli.resize
        && engine.resize(size).is_none()
    {
        log::warn!("no crop region to resize");
    }
    if let Some(delta) = delta {
        nudge(&mut engine, delta);
    }

    let file_name = cli
        .image_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let exported = match export_session(&source.image, &engine, &config, file_name) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Export error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = cli
        .output
        .unwrap_or_else(|| default_output(&cli.image_path, &exported.filename));
    if let Err(e) = std::fs::write(&output, &exported.bytes) {
        eprintln!("Error writing {}: {e}", output.display());
        return ExitCode::FAILURE;
    }
    log::info!(
        "Wrote {}x{} {} to {} ({} bytes)",
        exported.size,
        exported.size,
        exported.mime_type,
        output.display(),
        exported.bytes.len(),
    );

    if let Some(crop) = engine.to_persist_string() {
        println!("{crop}");
    }

    ExitCode::SUCCESS
}
