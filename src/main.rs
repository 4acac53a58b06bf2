use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use tracing::info;

use estate_map::favorites::{FileStorage, KeyValueStorage};
use estate_map::icon::svg_file_name;
use estate_map::logging::init_logging;
use estate_map::view::DetailPanel;
use estate_map::{
    AppConfig, ConfigOverrides, EngineSettings, FilterCriteria, HeadlessMap, MapController,
    MapEngineAdapter, PriceBucket, RecordId, SearchField, SourceFilter,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "estate-map",
    version,
    about = "Place, filter and inspect property listings on a map"
)]
struct Cli {
    /// Data document location (http(s) URL or file path)
    #[arg(long)]
    data: Option<String>,

    /// Map provider API key (ESTATE_MAP_API_KEY recommended)
    #[arg(long)]
    api_key: Option<String>,

    /// Directory holding persisted favorites
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Force dark (true) or light (false) panel styling
    #[arg(long)]
    dark_mode: Option<bool>,

    /// Free-text search query
    #[arg(long, default_value = "")]
    query: String,

    /// Field searched by --query (all, address, seller, price, lot, notes, id)
    #[arg(long, default_value = "all")]
    field: SearchField,

    /// Seller to restrict markers to, or "all"
    #[arg(long, default_value = "all")]
    source: String,

    /// Price bucket (all, 0-99k, 100-199k, 200-499k, 500-999k, 1000k+)
    #[arg(long, default_value = "all")]
    price: PriceBucket,

    /// Toggle a favorite before printing (repeatable)
    #[arg(long = "toggle-favorite", action = ArgAction::Append)]
    toggle_favorite: Vec<String>,

    /// Lock the selection on a record and print its detail panel
    #[arg(long)]
    inspect: Option<String>,

    /// Print distinct sellers and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_sources: bool,

    /// Write each marker icon as an SVG file into this directory
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let cfg = AppConfig::load(ConfigOverrides {
        api_key: cli.api_key.clone(),
        data_url: cli.data.clone(),
        storage_dir: cli.storage_dir.clone(),
        dark_mode: cli.dark_mode,
    })?;
    init_logging(&cli.log_level, cfg.debug)?;
    info!(
        data_url = %cfg.data_url,
        storage_dir = %cfg.storage_dir.display(),
        features = ?cfg.features,
        "app config"
    );
    cfg.validate()?;

    let storage = FileStorage::new(&cfg.storage_dir)
        .with_context(|| format!("open storage dir: {}", cfg.storage_dir.display()))?;
    let map = HeadlessMap::new(cfg.center, cfg.default_zoom);
    let mut app = MapController::new(EngineSettings::from(&cfg), map, storage);

    app.load_from(&cfg.data_source()).await;
    if let Some(notice) = app.notice() {
        bail!("{notice}");
    }

    if cli.list_sources {
        for source in app.source_options() {
            println!("{source}");
        }
        return Ok(());
    }

    app.set_criteria(FilterCriteria {
        query: cli.query,
        search_field: cli.field,
        source: SourceFilter::from(cli.source.as_str()),
        price_bucket: cli.price,
    });

    for id in &cli.toggle_favorite {
        app.toggle_favorite(&RecordId::from(id.as_str()))
            .with_context(|| format!("toggle favorite {id}"))?;
    }

    if let Some(dir) = &cli.svg_dir {
        write_icons(&app, dir)?;
    }

    print_markers(&app);
    println!();
    println!("Favorites:");
    for line in app.favorites_list().lines() {
        println!("  {line}");
    }

    if let Some(id) = &cli.inspect {
        app.on_click(&RecordId::from(id.as_str()));
        match app.panel() {
            Some(panel) => print_panel(panel),
            None => bail!("no marker with id {id}"),
        }
    }
    Ok(())
}

fn print_markers<M: MapEngineAdapter, S: KeyValueStorage>(app: &MapController<M, S>) {
    let visible = app.visible_ids();
    println!("Markers ({} of {} visible):", visible.len(), app.markers().len());
    for marker in app.markers().iter().filter(|m| m.visible) {
        let star = if app.favorites().contains(&marker.record.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{star} {:<12} {:<8} {}",
            marker.record.id,
            marker.icon.label.as_deref().unwrap_or("•"),
            marker.record.address
        );
    }
}

fn print_panel(panel: &DetailPanel) {
    println!();
    let lock = if panel.locked { " (locked)" } else { "" };
    println!("Details{lock}:");
    for field in &panel.fields {
        println!("  {:<14} {}", format!("{}:", field.label), field.value);
    }
    for photo in &panel.photos {
        println!("  {:<14} {}", format!("{}:", photo.label), photo.url);
    }
}

fn write_icons<M: MapEngineAdapter, S: KeyValueStorage>(
    app: &MapController<M, S>,
    dir: &Path,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create svg dir: {}", dir.display()))?;
    for (i, marker) in app.markers().iter().enumerate() {
        let path = dir.join(svg_file_name(i + 1, &marker.record.id));
        fs::write(&path, marker.icon.to_svg())
            .with_context(|| format!("write icon: {}", path.display()))?;
    }
    info!(count = app.markers().len(), dir = %dir.display(), "wrote marker icons");
    Ok(())
}
