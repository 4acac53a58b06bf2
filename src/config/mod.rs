use crate::geo::{BoundingRegion, Position};
use crate::record::DataSource;
use crate::view::{DEFAULT_PHOTO_BASE, ViewOptions};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Per-project directory holding `config.toml` and the default storage.
pub const PROJECT_DIR: &str = ".estate-map";
pub const DEFAULT_DATA_URL: &str = "./data.json";
pub const DEFAULT_ZOOM: u8 = 9;
pub const DEFAULT_CENTER: Position = Position { lat: 33.9, lng: 35.5 };

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Please set your map API key (api_key in config.toml or ESTATE_MAP_API_KEY).")]
    MissingApiKey,
    #[error("Invalid bounding region: {0}")]
    InvalidRegion(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub data_url: String,
    pub project_root: PathBuf,
    pub storage_dir: PathBuf,
    pub center: Position,
    pub default_zoom: u8,
    pub region: BoundingRegion,
    pub features: FeatureConfig,
    pub photo_base: String,
    pub debug: bool,
}

/// UI feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureConfig {
    pub dark_mode: bool,
    pub favorites: bool,
    pub search_filters: bool,
    pub auto_fit_bounds: bool,
    pub show_prices_on_pins: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            favorites: true,
            search_filters: true,
            auto_fit_bounds: true,
            show_prices_on_pins: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            api_key: None,
            data_url: DEFAULT_DATA_URL.to_string(),
            storage_dir: project_root.join(PROJECT_DIR).join("storage"),
            project_root,
            center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            region: BoundingRegion::default(),
            features: FeatureConfig::default(),
            photo_base: DEFAULT_PHOTO_BASE.to_string(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub data_url: Option<String>,
    pub storage_dir: Option<PathBuf>,
    pub default_zoom: Option<u8>,
    pub center: Option<Position>,
    pub region: Option<PartialRegionConfig>,
    pub features: Option<PartialFeatureConfig>,
    pub photo_base: Option<String>,
    pub debug: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialRegionConfig {
    pub lat_min: Option<f64>,
    pub lat_max: Option<f64>,
    pub lng_min: Option<f64>,
    pub lng_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialFeatureConfig {
    pub dark_mode: Option<bool>,
    pub favorites: Option<bool>,
    pub search_filters: Option<bool>,
    pub auto_fit_bounds: Option<bool>,
    pub show_prices_on_pins: Option<bool>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub data_url: Option<String>,
    pub storage_dir: Option<PathBuf>,
    pub dark_mode: Option<bool>,
}

impl AppConfig {
    /// Resolve configuration for the current directory.
    ///
    /// Priority: CLI overrides, environment, project config, global config,
    /// defaults.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let project_root = std::env::current_dir().context("resolve current dir")?;
        let project_cfg = load_project_config(&project_root).unwrap_or_default();
        let file_cfg = load_file_config().unwrap_or_default();
        Ok(Self::resolve(
            project_root,
            overrides,
            project_cfg,
            file_cfg,
            |key| std::env::var(key).ok(),
        ))
    }

    pub fn resolve<F>(
        project_root: PathBuf,
        overrides: ConfigOverrides,
        project_cfg: FileConfig,
        file_cfg: FileConfig,
        env: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_bool = |key: &str| env(key).and_then(|v| parse_bool(&v));

        let api_key = overrides
            .api_key
            .or_else(|| env("ESTATE_MAP_API_KEY"))
            .or(project_cfg.api_key)
            .or(file_cfg.api_key);

        let data_url = overrides
            .data_url
            .or_else(|| env("ESTATE_MAP_DATA_URL"))
            .or(project_cfg.data_url)
            .or(file_cfg.data_url)
            .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());

        let storage_dir = overrides
            .storage_dir
            .or_else(|| env("ESTATE_MAP_STORAGE_DIR").map(PathBuf::from))
            .or(project_cfg.storage_dir)
            .or(file_cfg.storage_dir)
            .map(|dir| {
                if dir.is_absolute() {
                    dir
                } else {
                    project_root.join(dir)
                }
            })
            .unwrap_or_else(|| project_root.join(PROJECT_DIR).join("storage"));

        let default_zoom = project_cfg
            .default_zoom
            .or(file_cfg.default_zoom)
            .unwrap_or(DEFAULT_ZOOM);
        let center = project_cfg
            .center
            .or(file_cfg.center)
            .unwrap_or(DEFAULT_CENTER);

        // Region bounds merge per edge: project config over global config.
        let region = {
            let defaults = BoundingRegion::default();
            let project = project_cfg.region.unwrap_or_default();
            let file = file_cfg.region.unwrap_or_default();
            BoundingRegion {
                lat_min: project.lat_min.or(file.lat_min).unwrap_or(defaults.lat_min),
                lat_max: project.lat_max.or(file.lat_max).unwrap_or(defaults.lat_max),
                lng_min: project.lng_min.or(file.lng_min).unwrap_or(defaults.lng_min),
                lng_max: project.lng_max.or(file.lng_max).unwrap_or(defaults.lng_max),
            }
        };

        let features = {
            let defaults = FeatureConfig::default();
            let project = project_cfg.features.unwrap_or_default();
            let file = file_cfg.features.unwrap_or_default();
            FeatureConfig {
                dark_mode: overrides
                    .dark_mode
                    .or_else(|| env_bool("ESTATE_MAP_DARK_MODE"))
                    .or(project.dark_mode)
                    .or(file.dark_mode)
                    .unwrap_or(defaults.dark_mode),
                favorites: project
                    .favorites
                    .or(file.favorites)
                    .unwrap_or(defaults.favorites),
                search_filters: project
                    .search_filters
                    .or(file.search_filters)
                    .unwrap_or(defaults.search_filters),
                auto_fit_bounds: project
                    .auto_fit_bounds
                    .or(file.auto_fit_bounds)
                    .unwrap_or(defaults.auto_fit_bounds),
                show_prices_on_pins: project
                    .show_prices_on_pins
                    .or(file.show_prices_on_pins)
                    .unwrap_or(defaults.show_prices_on_pins),
            }
        };

        let photo_base = project_cfg
            .photo_base
            .or(file_cfg.photo_base)
            .unwrap_or_else(|| DEFAULT_PHOTO_BASE.to_string());

        let debug = env_bool("ESTATE_MAP_DEBUG")
            .or(project_cfg.debug)
            .or(file_cfg.debug)
            .unwrap_or(false);

        Self {
            api_key,
            data_url,
            project_root,
            storage_dir,
            center,
            default_zoom,
            region,
            features,
            photo_base,
            debug,
        }
    }

    /// Startup checks. The engine has nothing to render onto without a map
    /// provider key, so a missing key is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && !key.contains("REPLACE") => {}
            _ => return Err(ConfigError::MissingApiKey),
        }
        let r = &self.region;
        let finite = [r.lat_min, r.lat_max, r.lng_min, r.lng_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || r.lat_min > r.lat_max || r.lng_min > r.lng_max {
            return Err(ConfigError::InvalidRegion(format!(
                "lat {}..{}, lng {}..{}",
                r.lat_min, r.lat_max, r.lng_min, r.lng_max
            )));
        }
        Ok(())
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::resolve(&self.data_url, &self.project_root)
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            dark_mode: self.features.dark_mode,
            favorites_enabled: self.features.favorites,
            photo_base: self.photo_base.clone(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn load_file_config() -> Result<FileConfig> {
    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = std::env::var("ESTATE_MAP_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join("estate-map/config.toml"));
        } else if let Some(dir) = dirs::config_dir() {
            v.push(dir.join("estate-map/config.toml"));
        }
        v
    }

    for p in candidate_paths() {
        if p.exists() {
            let s = fs::read_to_string(&p)
                .with_context(|| format!("read config file: {}", p.display()))?;
            match toml::from_str::<FileConfig>(&s) {
                Ok(cfg) => {
                    info!(path=%p.display(), "loaded config file");
                    return Ok(cfg);
                }
                Err(e) => {
                    warn!(path=%p.display(), error=%e.to_string(), "parse config failed");
                    continue;
                }
            }
        }
    }
    Ok(FileConfig::default())
}

/// Load project-specific configuration from .estate-map/config.toml
pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    let project_config_path = project_root.join(PROJECT_DIR).join("config.toml");

    if project_config_path.exists() {
        let s = fs::read_to_string(&project_config_path).with_context(|| {
            format!(
                "read project config file: {}",
                project_config_path.display()
            )
        })?;
        match toml::from_str::<FileConfig>(&s) {
            Ok(cfg) => {
                info!(path=%project_config_path.display(), "loaded project config file");
                Ok(cfg)
            }
            Err(e) => {
                warn!(path=%project_config_path.display(), error=%e.to_string(), "parse project config failed");
                Ok(FileConfig::default())
            }
        }
    } else {
        Ok(FileConfig::default())
    }
}

#[cfg(test)]
mod tests;
