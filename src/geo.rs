//! Geographic eligibility of property records.

use crate::record::PropertyRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A point on the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// Latitude/longitude rectangle outside of which records are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl Default for BoundingRegion {
    fn default() -> Self {
        Self {
            lat_min: 32.9,
            lat_max: 34.6,
            lng_min: 35.0,
            lng_max: 36.8,
        }
    }
}

impl BoundingRegion {
    /// Inclusive on every edge. Non-finite coordinates are never inside.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat.is_finite()
            && lng.is_finite()
            && lat >= self.lat_min
            && lat <= self.lat_max
            && lng >= self.lng_min
            && lng <= self.lng_max
    }
}

/// Keep only records whose coordinates lie inside `region`, preserving order.
pub fn validate(records: Vec<PropertyRecord>, region: &BoundingRegion) -> Vec<PropertyRecord> {
    let total = records.len();
    let kept: Vec<PropertyRecord> = records
        .into_iter()
        .filter(|r| match (r.lat, r.lng) {
            (Some(lat), Some(lng)) => region.contains(lat, lng),
            _ => false,
        })
        .collect();
    if kept.len() < total {
        debug!(
            dropped = total - kept.len(),
            kept = kept.len(),
            "dropped records outside the bounding region"
        );
    }
    kept
}
