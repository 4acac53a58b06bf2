use crate::config::{
    AppConfig, ConfigError, ConfigOverrides, FileConfig, PartialFeatureConfig,
    PartialRegionConfig, load_project_config,
};
use crate::geo::Position;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_load_project_config() {
    let temp_dir = TempDir::new().unwrap();
    let project_root = temp_dir.path();

    let project_dir = project_root.join(".estate-map");
    fs::create_dir_all(&project_dir).unwrap();

    let config_content = r#"
api_key = "abc123"
data_url = "https://example.com/data.json"
default_zoom = 11
center = { lat = 34.0, lng = 35.6 }

[region]
lat_min = 33.0

[features]
dark_mode = false
show_prices_on_pins = false
"#;

    fs::write(project_dir.join("config.toml"), config_content).unwrap();

    let project_cfg = load_project_config(project_root).unwrap();

    assert_eq!(project_cfg.api_key, Some("abc123".to_string()));
    assert_eq!(project_cfg.default_zoom, Some(11));
    assert_eq!(project_cfg.center, Some(Position { lat: 34.0, lng: 35.6 }));

    let region = project_cfg.region.unwrap();
    assert_eq!(region.lat_min, Some(33.0));
    assert_eq!(region.lat_max, None);

    let features = project_cfg.features.unwrap();
    assert_eq!(features.dark_mode, Some(false));
    assert_eq!(features.favorites, None);
}

#[test]
fn test_load_project_config_not_exists() {
    let temp_dir = TempDir::new().unwrap();
    let project_cfg = load_project_config(temp_dir.path()).unwrap();
    assert_eq!(project_cfg, FileConfig::default());
}

#[test]
fn test_load_project_config_invalid_is_default() {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path().join(".estate-map");
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(project_dir.join("config.toml"), "default_zoom = \"far\"").unwrap();
    let project_cfg = load_project_config(temp_dir.path()).unwrap();
    assert_eq!(project_cfg, FileConfig::default());
}

#[test]
fn test_resolve_defaults() {
    let root = PathBuf::from("/srv/site");
    let cfg = AppConfig::resolve(
        root.clone(),
        ConfigOverrides::default(),
        FileConfig::default(),
        FileConfig::default(),
        no_env,
    );
    assert_eq!(cfg.data_url, "./data.json");
    assert_eq!(cfg.default_zoom, 9);
    assert_eq!(cfg.center, Position { lat: 33.9, lng: 35.5 });
    assert_eq!(cfg.region.lat_max, 34.6);
    assert_eq!(cfg.storage_dir, root.join(".estate-map/storage"));
    assert!(cfg.features.favorites);
    assert!(cfg.features.dark_mode);
    assert!(!cfg.debug);
    assert_eq!(cfg.validate(), Err(ConfigError::MissingApiKey));
}

#[test]
fn test_resolve_priority() {
    let project_cfg = FileConfig {
        data_url: Some("project.json".into()),
        region: Some(PartialRegionConfig {
            lat_min: Some(30.0),
            ..Default::default()
        }),
        features: Some(PartialFeatureConfig {
            favorites: Some(false),
            ..Default::default()
        }),
        ..Default::default()
    };
    let file_cfg = FileConfig {
        api_key: Some("from-file".into()),
        data_url: Some("global.json".into()),
        default_zoom: Some(12),
        region: Some(PartialRegionConfig {
            lat_min: Some(31.0),
            lat_max: Some(40.0),
            ..Default::default()
        }),
        features: Some(PartialFeatureConfig {
            favorites: Some(true),
            search_filters: Some(false),
            ..Default::default()
        }),
        ..Default::default()
    };
    let env: HashMap<&str, &str> =
        HashMap::from([("ESTATE_MAP_DARK_MODE", "off"), ("ESTATE_MAP_DEBUG", "1")]);

    let cfg = AppConfig::resolve(
        PathBuf::from("/srv/site"),
        ConfigOverrides::default(),
        project_cfg,
        file_cfg,
        |key| env.get(key).map(|v| v.to_string()),
    );
    assert_eq!(cfg.api_key.as_deref(), Some("from-file"));
    assert_eq!(cfg.data_url, "project.json");
    assert_eq!(cfg.default_zoom, 12);
    assert_eq!(cfg.region.lat_min, 30.0);
    assert_eq!(cfg.region.lat_max, 40.0);
    assert!(!cfg.features.favorites);
    assert!(!cfg.features.search_filters);
    assert!(!cfg.features.dark_mode);
    assert!(cfg.debug);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_overrides_win() {
    let env = |key: &str| (key == "ESTATE_MAP_DATA_URL").then(|| "env.json".to_string());
    let cfg = AppConfig::resolve(
        PathBuf::from("/srv/site"),
        ConfigOverrides {
            api_key: Some("cli-key".into()),
            data_url: Some("cli.json".into()),
            storage_dir: Some(PathBuf::from("state")),
            dark_mode: Some(false),
        },
        FileConfig::default(),
        FileConfig::default(),
        env,
    );
    assert_eq!(cfg.api_key.as_deref(), Some("cli-key"));
    assert_eq!(cfg.data_url, "cli.json");
    assert_eq!(cfg.storage_dir, PathBuf::from("/srv/site/state"));
    assert!(!cfg.features.dark_mode);
}

#[test]
fn test_placeholder_api_key_is_rejected() {
    let mut cfg = AppConfig {
        api_key: Some("REPLACE_ME".into()),
        ..AppConfig::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::MissingApiKey));
    cfg.api_key = Some("   ".into());
    assert_eq!(cfg.validate(), Err(ConfigError::MissingApiKey));
}

#[test]
fn test_inverted_region_is_rejected() {
    let mut cfg = AppConfig {
        api_key: Some("key".into()),
        ..AppConfig::default()
    };
    cfg.region.lat_min = 35.0;
    cfg.region.lat_max = 34.0;
    assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRegion(_))));
}
