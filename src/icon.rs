//! Marker icon synthesis.
//!
//! Icons are described, not drawn: [`synthesize`] is a pure function of the
//! price and the resulting [`IconDescriptor`] is handed to the map surface.
//! [`IconDescriptor::to_svg`] produces the markup for surfaces that take SVG.

use crate::record::data::number_text;
use crate::record::{Price, RecordId};
use serde::Serialize;

pub const MARKER_FILL: &str = "#e63946";

pub const DOT_SIZE: u32 = 14;
pub const DOT_STROKE: u32 = 2;

pub const BADGE_BASE_WIDTH: u32 = 40;
pub const BADGE_CHAR_WIDTH: u32 = 5;
pub const BADGE_FREE_CHARS: usize = 4;
pub const BADGE_HEIGHT: u32 = 20;
pub const POINTER_WIDTH: u32 = 14;
pub const POINTER_HEIGHT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Dot,
    Badge,
}

/// Pixel offset inside the icon that sits on the marker's coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconDescriptor {
    pub shape: ShapeKind,
    /// Full icon width.
    pub width: u32,
    /// Full icon height, including the badge pointer.
    pub height: u32,
    pub label: Option<String>,
    pub anchor: Anchor,
}

/// Build the marker icon for a price. Undisclosed prices get a dot.
pub fn synthesize(price: &Price) -> IconDescriptor {
    match price.disclosed() {
        Some(amount) => IconDescriptor::badge(format_short_price(amount)),
        None => IconDescriptor::dot(),
    }
}

/// Short pin label: `$1.5M`, `$250K`, `$950`.
pub fn format_short_price(amount: f64) -> String {
    if amount >= 1e6 {
        format!("${}M", to_fixed(amount / 1e6, 1))
    } else if amount >= 1e3 {
        format!("${}K", to_fixed(amount / 1e3, 0))
    } else {
        format!("${}", number_text(amount))
    }
}

/// Fixed-point formatting with ties rounded up, as price labels have always
/// been rendered.
fn to_fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.decimals$}")
}

impl IconDescriptor {
    pub fn dot() -> Self {
        Self {
            shape: ShapeKind::Dot,
            width: DOT_SIZE,
            height: DOT_SIZE,
            label: None,
            anchor: Anchor {
                x: DOT_SIZE as f64 / 2.0,
                y: DOT_SIZE as f64 / 2.0,
            },
        }
    }

    pub fn badge(label: String) -> Self {
        let extra = label.chars().count().saturating_sub(BADGE_FREE_CHARS) as u32;
        let width = BADGE_BASE_WIDTH + extra * BADGE_CHAR_WIDTH;
        let height = BADGE_HEIGHT + POINTER_HEIGHT;
        Self {
            shape: ShapeKind::Badge,
            width,
            height,
            label: Some(label),
            anchor: Anchor {
                x: width as f64 / 2.0,
                y: height as f64,
            },
        }
    }

    pub fn to_svg(&self) -> String {
        match self.shape {
            ShapeKind::Dot => {
                let size = self.width;
                let center = number_text(size as f64 / 2.0);
                let radius = number_text((size - DOT_STROKE * 2) as f64 / 2.0);
                format!(
                    "<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}'>\
                     <circle cx='{center}' cy='{center}' r='{radius}' fill='{MARKER_FILL}' \
                     stroke='#fff' stroke-width='{DOT_STROKE}'/></svg>"
                )
            }
            ShapeKind::Badge => {
                let width = self.width as f64;
                let body = BADGE_HEIGHT as f64;
                let mid = width / 2.0;
                let left = number_text(mid - POINTER_WIDTH as f64 / 2.0);
                let right = number_text(mid + POINTER_WIDTH as f64 / 2.0);
                let tip = number_text(body + POINTER_HEIGHT as f64);
                let text_y = number_text(body * 68.0 / 100.0);
                let mid = number_text(mid);
                let label = self.label.as_deref().unwrap_or_default();
                format!(
                    "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}'>\
                     <rect width='{w}' height='{BADGE_HEIGHT}' rx='6' ry='6' fill='{MARKER_FILL}'/>\
                     <polygon points='{left},{BADGE_HEIGHT} {mid},{tip} {right},{BADGE_HEIGHT}' fill='{MARKER_FILL}'/>\
                     <text x='{mid}' y='{text_y}' font-size='13' font-weight='600' \
                     text-anchor='middle' fill='#fff'>{label}</text></svg>",
                    w = self.width,
                    h = self.height,
                )
            }
        }
    }

    /// The SVG wrapped in a `data:` URL, ready for an image-based marker.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/svg+xml;charset=UTF-8,{}",
            urlencoding::encode(&self.to_svg())
        )
    }
}

/// File name for a marker's SVG export. The 1-based ordinal keeps names
/// unique when ids collide after sanitizing or are missing.
pub fn svg_file_name(ordinal: usize, id: &RecordId) -> String {
    let name: String = id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() {
        format!("{ordinal:03}.svg")
    } else {
        format!("{ordinal:03}-{name}.svg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_price_labels() {
        assert_eq!(format_short_price(1_500_000.0), "$1.5M");
        assert_eq!(format_short_price(250_000.0), "$250K");
        assert_eq!(format_short_price(950.0), "$950");
        assert_eq!(format_short_price(1_000_000.0), "$1.0M");
        assert_eq!(format_short_price(2_500.0), "$3K");
        assert_eq!(format_short_price(1_250_000.0), "$1.3M");
        assert_eq!(format_short_price(12.5), "$12.5");
    }

    #[test]
    fn test_undisclosed_prices_are_dots() {
        let dot = IconDescriptor::dot();
        assert_eq!(synthesize(&Price::Value(0.0)), dot);
        assert_eq!(synthesize(&Price::Absent), dot);
        assert_eq!(synthesize(&Price::Value(-5.0)), dot);
        assert_eq!(synthesize(&Price::Invalid("soon".into())), dot);
        assert_eq!(dot.width, 14);
        assert_eq!(dot.anchor, Anchor { x: 7.0, y: 7.0 });
    }

    #[test]
    fn test_synthesize_is_pure() {
        let price = Price::Value(425_000.0);
        assert_eq!(synthesize(&price), synthesize(&price.clone()));
    }

    #[test]
    fn test_badge_geometry() {
        let icon = synthesize(&Price::Value(250_000.0));
        assert_eq!(icon.shape, ShapeKind::Badge);
        assert_eq!(icon.label.as_deref(), Some("$250K"));
        // "$250K" is one character over the free allowance.
        assert_eq!(icon.width, 45);
        assert_eq!(icon.height, 26);
        assert_eq!(icon.anchor, Anchor { x: 22.5, y: 26.0 });

        let short = synthesize(&Price::Value(950.0));
        assert_eq!(short.width, 40);
        assert_eq!(short.anchor.x, 20.0);
    }

    #[test]
    fn test_svg_markup() {
        let dot = IconDescriptor::dot().to_svg();
        assert!(dot.contains("<circle cx='7' cy='7' r='5'"));

        let badge = synthesize(&Price::Value(950.0)).to_svg();
        assert!(badge.contains("width='40' height='26'"));
        assert!(badge.contains("points='13,20 20,26 27,20'"));
        assert!(badge.contains("y='13.6'"));
        assert!(badge.contains(">$950</text>"));
    }

    #[test]
    fn test_data_url_is_encoded() {
        let url = IconDescriptor::dot().to_data_url();
        assert!(url.starts_with("data:image/svg+xml;charset=UTF-8,%3Csvg"));
        assert!(!url.contains('#'));
    }

    #[test]
    fn test_svg_file_names_never_collide() {
        let names = [
            svg_file_name(1, &"a.b".into()),
            svg_file_name(2, &"a_b".into()),
            svg_file_name(3, &RecordId::default()),
            svg_file_name(4, &RecordId::default()),
        ];
        assert_eq!(names, ["001-a_b.svg", "002-a_b.svg", "003.svg", "004.svg"]);
    }
}
