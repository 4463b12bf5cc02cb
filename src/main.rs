use std::path::PathBuf;

use anyhow::{Result, anyhow};
use bubble_magnet::app::BubbleApp;
use bubble_magnet::catalog::Catalog;
use bubble_magnet::magnetic::EngineConfig;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON dataset of entities (`shortName` / `next`); defaults to the bundled composers.
    #[arg(long)]
    data: Option<PathBuf>,
    /// JSON engine configuration; missing keys fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Selecting a bubble deselects the previous one.
    #[arg(long)]
    single_selection: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.single_selection {
        config.allows_multiple_selection = false;
    }

    let catalog = match &args.data {
        Some(path) => Catalog::load(path)?,
        None => Catalog::bundled()?,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "bubble-magnet",
        options,
        Box::new(move |cc| Ok(Box::new(BubbleApp::new(cc, catalog, config)))),
    )
    .map_err(|error| anyhow!("window closed with an error: {error}"))
}
