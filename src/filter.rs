//! Multi-criteria marker filtering.
//!
//! The whole record set is re-evaluated on every criteria change; data sets
//! are small enough that no incremental bookkeeping is kept.

use crate::record::{PropertyRecord, RecordId};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("Unknown search field: {0}")]
    UnknownField(String),
    #[error("Unknown price bucket: {0}")]
    UnknownBucket(String),
}

/// Which record field free-text search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchField {
    #[default]
    All,
    Address,
    Seller,
    Price,
    Lot,
    Notes,
    Id,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::All => "all",
            SearchField::Address => "address",
            SearchField::Seller => "seller",
            SearchField::Price => "price",
            SearchField::Lot => "lot",
            SearchField::Notes => "notes",
            SearchField::Id => "id",
        }
    }
}

impl FromStr for SearchField {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(SearchField::All),
            "address" => Ok(SearchField::Address),
            "seller" => Ok(SearchField::Seller),
            "price" => Ok(SearchField::Price),
            "lot" => Ok(SearchField::Lot),
            "notes" => Ok(SearchField::Notes),
            "id" => Ok(SearchField::Id),
            _ => Err(CriteriaError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seller restriction. Matching is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceFilter {
    #[default]
    All,
    Seller(String),
}

impl From<&str> for SourceFilter {
    fn from(value: &str) -> Self {
        if value == "all" {
            SourceFilter::All
        } else {
            SourceFilter::Seller(value.to_string())
        }
    }
}

/// Coarse half-open price ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceBucket {
    #[default]
    All,
    Under100k,
    From100kTo200k,
    From200kTo500k,
    From500kTo1m,
    Over1m,
}

impl PriceBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBucket::All => "all",
            PriceBucket::Under100k => "0-99k",
            PriceBucket::From100kTo200k => "100-199k",
            PriceBucket::From200kTo500k => "200-499k",
            PriceBucket::From500kTo1m => "500-999k",
            PriceBucket::Over1m => "1000k+",
        }
    }

    /// `(inclusive lower, exclusive upper)`; `None` for [`PriceBucket::All`].
    pub fn bounds(&self) -> Option<(f64, Option<f64>)> {
        match self {
            PriceBucket::All => None,
            PriceBucket::Under100k => Some((f64::NEG_INFINITY, Some(100_000.0))),
            PriceBucket::From100kTo200k => Some((100_000.0, Some(200_000.0))),
            PriceBucket::From200kTo500k => Some((200_000.0, Some(500_000.0))),
            PriceBucket::From500kTo1m => Some((500_000.0, Some(1_000_000.0))),
            PriceBucket::Over1m => Some((1_000_000.0, None)),
        }
    }

    pub fn contains(&self, amount: f64) -> bool {
        match self.bounds() {
            None => true,
            Some((lower, upper)) => amount >= lower && upper.is_none_or(|u| amount < u),
        }
    }
}

impl FromStr for PriceBucket {
    type Err = CriteriaError;

    /// Accepts both `100-199k` style names and the bare `100-199` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(PriceBucket::All),
            "0-99k" | "0-99" => Ok(PriceBucket::Under100k),
            "100-199k" | "100-199" => Ok(PriceBucket::From100kTo200k),
            "200-499k" | "200-499" => Ok(PriceBucket::From200kTo500k),
            "500-999k" | "500-999" => Ok(PriceBucket::From500kTo1m),
            "1000k+" | "1000+" => Ok(PriceBucket::Over1m),
            _ => Err(CriteriaError::UnknownBucket(s.to_string())),
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub search_field: SearchField,
    pub source: SourceFilter,
    pub price_bucket: PriceBucket,
}

impl FilterCriteria {
    pub fn is_unfiltered(&self) -> bool {
        self.query.trim().is_empty()
            && self.source == SourceFilter::All
            && self.price_bucket == PriceBucket::All
    }
}

/// Visibility of every evaluated record, in evaluation order. Ids are not
/// unique keys (records may share one or lack one), so lookups are by
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    entries: Vec<(RecordId, bool)>,
}

impl FilterResult {
    pub fn is_visible(&self, index: usize) -> Option<bool> {
        self.entries.get(index).map(|(_, show)| *show)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, bool)> {
        self.entries.iter().map(|(id, show)| (id, *show))
    }

    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|(_, show)| *show).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Text that free-text search runs against. `All` joins the searchable
/// fields with spaces.
pub fn searchable_text(record: &PropertyRecord, field: SearchField) -> String {
    match field {
        SearchField::Address => record.address.clone(),
        SearchField::Seller => record.seller.clone(),
        SearchField::Price => record.price.search_text(),
        SearchField::Lot => record.lot.clone(),
        SearchField::Notes => record.notes.clone(),
        SearchField::Id => record.id.to_string(),
        SearchField::All => [
            record.address.as_str(),
            record.seller.as_str(),
            record.notes.as_str(),
            record.price.search_text().as_str(),
            record.lot.as_str(),
            record.id.as_str(),
        ]
        .join(" "),
    }
}

/// Whether a single record passes every criterion.
pub fn matches(record: &PropertyRecord, criteria: &FilterCriteria) -> bool {
    let query = criteria.query.trim().to_lowercase();
    let mut show = query.is_empty()
        || searchable_text(record, criteria.search_field)
            .to_lowercase()
            .contains(&query);

    if let SourceFilter::Seller(seller) = &criteria.source {
        show = show && record.seller == *seller;
    }

    if criteria.price_bucket != PriceBucket::All {
        show = match record.price.bucket_amount() {
            Some(amount) if amount.is_finite() => show && criteria.price_bucket.contains(amount),
            _ => false,
        };
    }
    show
}

pub fn evaluate<'a, I>(records: I, criteria: &FilterCriteria) -> FilterResult
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let entries = records
        .into_iter()
        .map(|record| (record.id.clone(), matches(record, criteria)))
        .collect();
    FilterResult { entries }
}

/// Distinct non-blank sellers, sorted, for the source selector.
pub fn source_options<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    records
        .into_iter()
        .map(|r| r.seller.as_str())
        .filter(|s| !s.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
