mod app;
mod bubbles;
mod util;
mod words;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bubbles::{ChartConfig, ValueField};
use words::Catalog;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding the word-frequency CSV files.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Catalog key of the text to open first.
    #[arg(long, default_value = "All")]
    text: String,
    /// JSON list of `{key, file, name}` entries replacing the built-in texts.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long, default_value_t = 0.5)]
    jitter: f32,
    /// Record field that sizes the bubbles.
    #[arg(long, value_enum, default_value_t = ValueField::Count)]
    value: ValueField,
    #[arg(long, default_value_t = 980.0)]
    width: f32,
    #[arg(long, default_value_t = 510.0)]
    height: f32,
    /// Word to select on start, as a `#fragment` or plain text.
    #[arg(long)]
    select: Option<String>,
    /// Shuffle word order with this seed before packing.
    #[arg(long)]
    shuffle_seed: Option<u64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin(),
    };
    let config = ChartConfig::default()
        .with_size(args.width, args.height)
        .with_jitter(args.jitter)
        .with_value_accessor(args.value.accessor());
    let settings = app::Settings {
        catalog,
        data_dir: args.data_dir,
        shuffle_seed: args.shuffle_seed,
        config,
        value_field: args.value,
        initial_text: args.text,
        initial_fragment: args.select.unwrap_or_default(),
    };
    info!(data_dir = %settings.data_dir.display(), text = %settings.initial_text, "starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "word bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::WordBubblesApp::new(cc, settings)))),
    )
    .map_err(|error| anyhow!("failed to run the window: {error}"))
}
