//! Map viewer CLI.
//!
//! Renders the classified WSI/WDRI layers for one year with the ward
//! boundaries and writes the map as a standalone HTML file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use map_common::LayerId;
use map_viewer::{export_html, render, Basemap, RenderRequest, ViewerConfig};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "map-viewer")]
#[command(about = "Nairobi water scarcity and disease risk hotspot map export")]
struct Args {
    /// Year to display (default: first configured year)
    #[arg(short, long, env = "MAP_YEAR")]
    year: Option<i32>,

    /// Viewer configuration file (default: built-in Nairobi config)
    #[arg(long, env = "VIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing the classified rasters and ward boundaries
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output file or directory (default: configured export name)
    #[arg(short, long, env = "MAP_OUTPUT")]
    output: Option<PathBuf>,

    /// Hide a layer (wsi, wdri-wet, wdri-dry); may be repeated
    #[arg(long = "hide", value_name = "LAYER")]
    hide: Vec<LayerId>,

    /// Do not draw ward boundaries
    #[arg(long)]
    no_wards: bool,

    /// Overlay opacity, 0.1 to 1.0
    #[arg(long)]
    opacity: Option<f64>,

    /// Base map tiles
    #[arg(long, value_enum)]
    basemap: Option<Basemap>,

    /// Initial zoom level, 5 to 18
    #[arg(long)]
    zoom: Option<u8>,

    /// Disable the measurement tool
    #[arg(long)]
    no_measure: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ViewerConfig::load(args.config.as_deref()).context("loading viewer config")?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let year = args.year.unwrap_or_else(|| config.default_year());
    let mut request = RenderRequest::new(&config, year);
    for layer in args.hide {
        request = request.hide(layer);
    }
    request.show_wards = !args.no_wards;
    request.show_measure = !args.no_measure;
    if let Some(opacity) = args.opacity {
        request.opacity = opacity;
    }
    if let Some(zoom) = args.zoom {
        request.zoom = zoom;
    }
    if let Some(basemap) = args.basemap {
        request.basemap = basemap;
    }

    info!(
        year,
        data_dir = %config.data_dir.display(),
        layers = request.visible_layers().count(),
        wards = request.show_wards,
        "Rendering map"
    );

    let outcome = render(&config, &request)?;

    if outcome.has_errors() {
        warn!(
            skipped = ?outcome.skipped.iter().map(|s| s.subject).collect::<Vec<_>>(),
            "Some layers could not be loaded"
        );
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(config.export_file_name(year)));
    let written = export_html(&config, &outcome.document, &output)
        .with_context(|| format!("exporting map to {}", output.display()))?;

    info!(
        path = %written.display(),
        loaded = outcome.loaded.len(),
        skipped = outcome.skipped.len(),
        "Map exported"
    );

    Ok(())
}
