//! Presentation-free view models for the detail panel and the favorites list.

use crate::favorites::FavoritesSet;
use crate::record::{Price, PropertyRecord, RecordId};
use crate::record::data::number_text;
use serde::Serialize;

pub const ACCENT_LIGHT: &str = "#0077ff";
pub const ACCENT_DARK: &str = "#339af0";
pub const EMPTY_FAVORITES: &str = "No favorites yet.";
pub const DEFAULT_PHOTO_BASE: &str = "assets/photos/";

/// Rendering options for the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub dark_mode: bool,
    pub favorites_enabled: bool,
    /// Prefix for photo entries that are bare file names.
    pub photo_base: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            dark_mode: false,
            favorites_enabled: true,
            photo_base: DEFAULT_PHOTO_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelAction {
    ToggleFavorite { id: RecordId, label: &'static str },
    ExitLock { label: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPanel {
    pub record_id: RecordId,
    pub fields: Vec<DetailField>,
    pub photos: Vec<PhotoLink>,
    pub actions: Vec<PanelAction>,
    pub locked: bool,
    pub accent: &'static str,
}

impl DetailPanel {
    pub fn build(
        record: &PropertyRecord,
        is_favorite: bool,
        locked: bool,
        options: &ViewOptions,
    ) -> Self {
        let photos = photo_links(&record.photos, &options.photo_base);
        let photo_labels = photos
            .iter()
            .map(|p| p.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let field = |label, value: &str| DetailField {
            label,
            value: value.to_string(),
        };
        let fields = vec![
            field("Address", &record.address),
            field("Seller", &record.seller),
            field("Phone", &record.phone),
            field("Price", &format_full_price(&record.price)),
            field("Price per M²", &record.price_per_area),
            field("Notes", &record.notes),
            field("ID", record.id.as_str()),
            field("Photos", &photo_labels),
        ];

        let mut actions = Vec::with_capacity(2);
        if options.favorites_enabled {
            actions.push(PanelAction::ToggleFavorite {
                id: record.id.clone(),
                label: if is_favorite {
                    "Remove from favorites"
                } else {
                    "Add to favorites"
                },
            });
        }
        actions.push(PanelAction::ExitLock { label: "Exit" });

        Self {
            record_id: record.id.clone(),
            fields,
            photos,
            actions,
            locked,
            accent: if options.dark_mode {
                ACCENT_DARK
            } else {
                ACCENT_LIGHT
            },
        }
    }

    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

/// Split a photos string on commas and whitespace. Entries starting with
/// `http` are used as-is, anything else is a file under `base`.
pub fn photo_links(photos: &str, base: &str) -> Vec<PhotoLink> {
    photos
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(idx, item)| PhotoLink {
            label: format!("Link {}", idx + 1),
            url: if item.starts_with("http") {
                item.to_string()
            } else {
                format!("{base}{item}")
            },
        })
        .collect()
}

/// Full price with thousands separators, e.g. `$1,250,000`. Empty when the
/// price is missing or zero.
pub fn format_full_price(price: &Price) -> String {
    match price {
        Price::Absent => String::new(),
        Price::Value(n) if *n == 0.0 => String::new(),
        Price::Value(n) => format!("${}", group_thousands(*n)),
        Price::Invalid(text) => text.clone(),
    }
}

fn group_thousands(n: f64) -> String {
    let rounded = (n * 1000.0).round() / 1000.0;
    let text = number_text(rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteEntry {
    /// 1-based position among rendered entries.
    pub index: usize,
    pub id: RecordId,
    pub label: String,
}

/// Ordered favorites for display. Ids without a loaded record are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FavoritesList {
    pub entries: Vec<FavoriteEntry>,
}

impl FavoritesList {
    pub fn build<'a, F>(favorites: &FavoritesSet, lookup: F) -> Self
    where
        F: Fn(&RecordId) -> Option<&'a PropertyRecord>,
    {
        let entries = favorites
            .iter()
            .filter_map(|id| lookup(id))
            .enumerate()
            .map(|(i, record)| {
                let name = if record.address.is_empty() {
                    format!("Property #{}", record.id)
                } else {
                    record.address.clone()
                };
                FavoriteEntry {
                    index: i + 1,
                    id: record.id.clone(),
                    label: format!("{}. {}", i + 1, name),
                }
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text shown in place of the list when nothing is favorited.
    pub fn placeholder() -> &'static str {
        EMPTY_FAVORITES
    }

    /// Lines to render; a single placeholder line when there are no entries.
    pub fn lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![Self::placeholder().to_string()];
        }
        self.entries.iter().map(|e| e.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PropertyRecord {
        PropertyRecord {
            address: "Gemmayzeh".into(),
            seller: "Acme".into(),
            phone: "01 234 567".into(),
            price: Price::Value(1_250_000.0),
            price_per_area: "2500".into(),
            notes: "Top floor".into(),
            photos: "front.jpg, https://img.example.com/2.jpg\nback.jpg".into(),
            ..PropertyRecord::new("B-9", 33.89, 35.51)
        }
    }

    #[test]
    fn test_panel_fields_in_order() {
        let panel = DetailPanel::build(&record(), false, true, &ViewOptions::default());
        let labels: Vec<&str> = panel.fields.iter().map(|f| f.label).collect();
        assert_eq!(
            labels,
            vec![
                "Address",
                "Seller",
                "Phone",
                "Price",
                "Price per M²",
                "Notes",
                "ID",
                "Photos"
            ]
        );
        assert_eq!(panel.field("Price"), Some("$1,250,000"));
        assert_eq!(panel.field("Photos"), Some("Link 1, Link 2, Link 3"));
        assert!(panel.locked);
        assert_eq!(panel.accent, ACCENT_LIGHT);
    }

    #[test]
    fn test_panel_actions() {
        let options = ViewOptions::default();
        let panel = DetailPanel::build(&record(), true, false, &options);
        assert_eq!(
            panel.actions,
            vec![
                PanelAction::ToggleFavorite {
                    id: "B-9".into(),
                    label: "Remove from favorites"
                },
                PanelAction::ExitLock { label: "Exit" }
            ]
        );

        let options = ViewOptions {
            favorites_enabled: false,
            dark_mode: true,
            ..ViewOptions::default()
        };
        let panel = DetailPanel::build(&record(), false, false, &options);
        assert_eq!(panel.actions, vec![PanelAction::ExitLock { label: "Exit" }]);
        assert_eq!(panel.accent, ACCENT_DARK);
    }

    #[test]
    fn test_photo_links_resolve_bare_names() {
        let links = photo_links(&record().photos, "assets/photos/");
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "assets/photos/front.jpg",
                "https://img.example.com/2.jpg",
                "assets/photos/back.jpg"
            ]
        );
        assert!(photo_links("  , ", "x/").is_empty());
    }

    #[test]
    fn test_full_price_format() {
        assert_eq!(format_full_price(&Price::Value(950.0)), "$950");
        assert_eq!(format_full_price(&Price::Value(150_000.0)), "$150,000");
        assert_eq!(format_full_price(&Price::Value(1234.5678)), "$1,234.568");
        assert_eq!(format_full_price(&Price::Value(0.0)), "");
        assert_eq!(format_full_price(&Price::Absent), "");
    }

    #[test]
    fn test_favorites_list_skips_unknown_ids() {
        let known = record();
        let mut unnamed = PropertyRecord::new("7", 33.5, 35.5);
        unnamed.address.clear();
        let records = [known, unnamed];

        let mut favorites = FavoritesSet::default();
        favorites.insert("missing".into());
        favorites.insert("7".into());
        favorites.insert("B-9".into());

        let list = FavoritesList::build(&favorites, |id| records.iter().find(|r| &r.id == id));
        assert_eq!(list.lines(), vec!["1. Property #7", "2. Gemmayzeh"]);
        assert_eq!(list.entries[1].index, 2);
    }

    #[test]
    fn test_empty_favorites_placeholder() {
        let list = FavoritesList::default();
        assert!(list.is_empty());
        assert_eq!(FavoritesList::placeholder(), "No favorites yet.");
        assert_eq!(list.lines(), vec![FavoritesList::placeholder()]);
    }
}
