//! Coordinating controller.
//!
//! [`MapController`] owns the whole application state (markers, favorites,
//! selection, filter criteria) and is the single place where events from the
//! presentation layer are turned into map-surface calls and view models.

use crate::config::{AppConfig, FeatureConfig};
use crate::favorites::{FavoritesError, FavoritesStore, KeyValueStorage};
use crate::filter::{self, FilterCriteria};
use crate::geo::{self, BoundingRegion, Position};
use crate::icon::{self, IconDescriptor};
use crate::map::{FIT_BOUNDS_PADDING, FOCUS_ZOOM, MapEngineAdapter, MarkerHandle};
use crate::record::{DataSource, LoadError, PropertyRecord, RecordId, fetch_document};
use crate::selection::{SelectionController, SelectionOutcome, SelectionState};
use crate::view::{DetailPanel, FavoritesList, ViewOptions};
use tracing::{debug, error, info};

/// The slice of configuration the controller reads.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub region: BoundingRegion,
    pub features: FeatureConfig,
    pub view: ViewOptions,
}

impl From<&AppConfig> for EngineSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            region: cfg.region,
            features: cfg.features,
            view: cfg.view_options(),
        }
    }
}

/// A record placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub record: PropertyRecord,
    pub icon: IconDescriptor,
    pub handle: MarkerHandle,
    pub visible: bool,
}

/// User-visible notices. Each is raised once and left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoadFailed(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::LoadFailed(msg) => write!(f, "Could not load property data: {msg}"),
        }
    }
}

pub struct MapController<M: MapEngineAdapter, S: KeyValueStorage> {
    settings: EngineSettings,
    map: M,
    markers: Vec<MarkerView>,
    favorites: FavoritesStore<S>,
    selection: SelectionController,
    criteria: FilterCriteria,
    panel: Option<DetailPanel>,
    favorites_list: FavoritesList,
    source_options: Vec<String>,
    notice: Option<Notice>,
}

impl<M: MapEngineAdapter, S: KeyValueStorage> MapController<M, S> {
    pub fn new(settings: EngineSettings, map: M, storage: S) -> Self {
        let favorites = FavoritesStore::load(storage);
        Self {
            settings,
            map,
            markers: Vec::new(),
            favorites,
            selection: SelectionController::new(),
            criteria: FilterCriteria::default(),
            panel: None,
            favorites_list: FavoritesList::default(),
            source_options: Vec::new(),
            notice: None,
        }
    }

    /// Fetch the data document and populate the map from it.
    pub async fn load_from(&mut self, source: &DataSource) {
        let result = fetch_document(source).await;
        self.populate(result);
    }

    /// Replace every marker with the records of a freshly loaded document.
    /// A failed load leaves the map empty and raises a notice.
    pub fn populate(&mut self, loaded: Result<Vec<PropertyRecord>, LoadError>) {
        self.clear_markers();

        let records = match loaded {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "failed to load property data");
                self.notice = Some(Notice::LoadFailed(e.to_string()));
                self.rebuild_favorites_list();
                return;
            }
        };
        self.notice = None;

        let total = records.len();
        for (i, record) in geo::validate(records, &self.settings.region)
            .into_iter()
            .enumerate()
        {
            let Some(position) = record.position() else {
                continue;
            };
            let icon = if self.settings.features.show_prices_on_pins {
                icon::synthesize(&record.price)
            } else {
                IconDescriptor::dot()
            };
            let handle = self.map.create_marker(position, &icon, &record.title(i + 1));
            self.markers.push(MarkerView {
                record,
                icon,
                handle,
                visible: true,
            });
        }

        self.source_options = filter::source_options(self.markers.iter().map(|m| &m.record));

        if self.settings.features.auto_fit_bounds && !self.markers.is_empty() {
            let positions: Vec<Position> = self
                .markers
                .iter()
                .filter_map(|m| m.record.position())
                .collect();
            self.map.fit_bounds(&positions, FIT_BOUNDS_PADDING);
        }

        self.apply_filters();
        self.rebuild_favorites_list();
        info!(loaded = total, markers = self.markers.len(), "populated map markers");
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.apply_filters();
    }

    pub fn update_criteria(&mut self, update: impl FnOnce(&mut FilterCriteria)) {
        update(&mut self.criteria);
        self.apply_filters();
    }

    pub fn on_hover(&mut self, id: &RecordId) -> SelectionOutcome {
        if self.marker(id).is_none() {
            return SelectionOutcome::Ignored;
        }
        let outcome = self.selection.hover(id);
        self.apply_outcome(outcome)
    }

    pub fn on_click(&mut self, id: &RecordId) -> SelectionOutcome {
        if self.marker(id).is_none() {
            return SelectionOutcome::Ignored;
        }
        let outcome = self.selection.click(id);
        self.apply_outcome(outcome)
    }

    pub fn on_exit(&mut self) -> SelectionOutcome {
        let outcome = self.selection.exit();
        self.apply_outcome(outcome)
    }

    /// Flip a favorite, rebuild the favorites list and refresh the open
    /// detail panel in place.
    pub fn toggle_favorite(&mut self, id: &RecordId) -> Result<(), FavoritesError> {
        if !self.settings.features.favorites {
            debug!(%id, "favorites disabled; ignoring toggle");
            return Ok(());
        }
        self.favorites.toggle(id)?;
        self.rebuild_favorites_list();
        let outcome = self.selection.refresh();
        self.apply_outcome(outcome);
        Ok(())
    }

    /// Focus the record behind a favorites-list entry (1-based index).
    pub fn select_favorite(&mut self, index: usize) -> SelectionOutcome {
        let Some(entry) = self
            .favorites_list
            .entries
            .iter()
            .find(|e| e.index == index)
        else {
            return SelectionOutcome::Ignored;
        };
        let id = entry.id.clone();
        let Some(position) = self.marker(&id).and_then(|m| m.record.position()) else {
            return SelectionOutcome::Ignored;
        };
        self.map.pan_to(position);
        let zoom = self.map.zoom().max(FOCUS_ZOOM);
        self.map.set_zoom(zoom);
        let outcome = self.selection.show(&id);
        self.apply_outcome(outcome)
    }

    pub fn markers(&self) -> &[MarkerView] {
        &self.markers
    }

    pub fn marker(&self, id: &RecordId) -> Option<&MarkerView> {
        self.markers.iter().find(|m| &m.record.id == id)
    }

    pub fn visible_ids(&self) -> Vec<&RecordId> {
        self.markers
            .iter()
            .filter(|m| m.visible)
            .map(|m| &m.record.id)
            .collect()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn panel(&self) -> Option<&DetailPanel> {
        self.panel.as_ref()
    }

    pub fn favorites_list(&self) -> &FavoritesList {
        &self.favorites_list
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn source_options(&self) -> &[String] {
        &self.source_options
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    fn clear_markers(&mut self) {
        for marker in self.markers.drain(..) {
            self.map.remove_marker(marker.handle);
        }
        self.source_options.clear();
        self.selection = SelectionController::new();
        self.panel = None;
    }

    fn apply_filters(&mut self) {
        let result = if self.settings.features.search_filters {
            Some(filter::evaluate(
                self.markers.iter().map(|m| &m.record),
                &self.criteria,
            ))
        } else {
            None
        };
        for (index, marker) in self.markers.iter_mut().enumerate() {
            let visible = result
                .as_ref()
                .and_then(|r| r.is_visible(index))
                .unwrap_or(true);
            marker.visible = visible;
            self.map.set_visible(marker.handle, visible);
        }
        debug!(
            visible = self.markers.iter().filter(|m| m.visible).count(),
            total = self.markers.len(),
            "applied filters"
        );
    }

    fn apply_outcome(&mut self, outcome: SelectionOutcome) -> SelectionOutcome {
        match &outcome {
            SelectionOutcome::Display(id) => {
                let locked = self.selection.state().is_locked();
                self.panel = self.marker(id).map(|m| {
                    DetailPanel::build(
                        &m.record,
                        self.favorites.contains(id),
                        locked,
                        &self.settings.view,
                    )
                });
            }
            SelectionOutcome::Hide => self.panel = None,
            SelectionOutcome::Ignored => {}
        }
        outcome
    }

    fn rebuild_favorites_list(&mut self) {
        let list = FavoritesList::build(self.favorites.ids(), |id| {
            self.markers
                .iter()
                .find(|m| &m.record.id == id)
                .map(|m| &m.record)
        });
        self.favorites_list = list;
    }
}
