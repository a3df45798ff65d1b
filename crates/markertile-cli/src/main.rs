//! markertile - Generate fiducial marker tiles for the Gazebo simulator
//!
//! Rasterizes one marker from a predefined dictionary, shows it for
//! confirmation, then writes the matching simulator model (texture, material
//! script, model.config and model.sdf) under the installation root.

mod config;
mod preview;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use markertile_core::{AssetEmitter, AssetLayout, DictionarySet, MarkerRequest};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "Usage: markertile <DICT> <ID> <SIZE>";
const EXAMPLE: &str = "Example: markertile 7x7 2 0.1";

#[derive(Parser, Debug)]
#[command(name = "markertile")]
#[command(about = "Generate a fiducial marker and its Gazebo tile model")]
#[command(version)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Dictionary identifier (e.g. 4x4, 5x5, 6x6, 7x7)
    dict: String,

    /// Marker id within the dictionary
    id: String,

    /// Marker side length in meters
    size: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "markertile.toml")]
    config: PathBuf,

    /// Installation root for markers/ and models/
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Dictionary identifier set
    #[arg(short, long, value_enum)]
    dictionaries: Option<DictionarySetArg>,

    /// Skip the preview and write the model without waiting
    #[arg(long)]
    no_preview: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DictionarySetArg {
    Aruco,
    Extended,
}

impl From<DictionarySetArg> for DictionarySet {
    fn from(arg: DictionarySetArg) -> Self {
        match arg {
            DictionarySetArg::Aruco => DictionarySet::Aruco,
            DictionarySetArg::Extended => DictionarySet::Extended,
        }
    }
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e.render());
            eprintln!("{}", USAGE);
            eprintln!("{}", EXAMPLE);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("markertile v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    if let Some(root) = args.root {
        config.output.root = Some(root);
    }
    if let Some(set) = args.dictionaries {
        config.markers.dictionaries = set.into();
    }
    if args.no_preview {
        config.preview.enabled = false;
    }

    let request = MarkerRequest::parse(config.markers.dictionaries, &args.dict, &args.id, &args.size)?;
    let name = request.marker_name();

    info!(
        dictionary = %request.dictionary(),
        id = request.id(),
        size = request.size(),
        name = %name,
        "Generating marker"
    );

    let marker = request
        .rasterize()
        .with_context(|| format!("Failed to rasterize {}", name))?;

    let root = config
        .output
        .resolve_root()
        .context("Failed to resolve the installation root")?;
    let emitter = AssetEmitter::new(AssetLayout::new(root), config.model.clone());
    println!(
        "Saving marker to: {}",
        emitter.layout().marker_image_path(&name).display()
    );

    let mut gate = preview::TerminalPreview::new(config.preview.enabled, config.preview.open_viewer);
    let assets = emitter
        .emit(&name, &marker, request.size(), &mut gate)
        .with_context(|| format!("Failed to write assets for {}", name))?;

    println!("Tile created: {}", assets.model_dir.display());
    Ok(())
}
