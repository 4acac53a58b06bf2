pub mod app;
pub mod config;
pub mod favorites;
pub mod filter;
pub mod geo;
pub mod icon;
pub mod logging;
pub mod map;
pub mod record;
pub mod selection;
pub mod view;

pub use app::{EngineSettings, MapController, MarkerView, Notice};
pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use filter::{FilterCriteria, PriceBucket, SearchField, SourceFilter};
pub use geo::{BoundingRegion, Position};
pub use icon::IconDescriptor;
pub use map::{HeadlessMap, MapEngineAdapter, MarkerHandle};
pub use record::{Price, PropertyRecord, RecordId};
