use crate::record::data::PropertyRecord;
use crate::record::error::LoadError;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the property data document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// Interpret a configured location. `http(s)://` locations are fetched over
    /// the network; anything else is a file path, relative to `base`.
    pub fn resolve(location: &str, base: &Path) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return DataSource::Url(trimmed.to_string());
        }
        let path = Path::new(trimmed);
        if path.is_absolute() {
            DataSource::Path(path.to_path_buf())
        } else {
            DataSource::Path(base.join(path))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse a data document: either a bare array of records or an object with a
/// `properties` array. Elements that are not objects are skipped.
pub fn parse_document(text: &str) -> Result<Vec<PropertyRecord>, LoadError> {
    let doc: Value = serde_json::from_str(text)?;
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("properties") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => return Err(LoadError::Shape),
    };

    let total = items.len();
    let records: Vec<PropertyRecord> = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| match serde_json::from_value::<PropertyRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "skipping unreadable record");
                None
            }
        })
        .collect();
    if records.len() != total {
        debug!(
            skipped = total - records.len(),
            "skipped non-record entries in data document"
        );
    }
    Ok(records)
}

/// Fetch and parse the data document. The response is never served from a
/// cache.
pub async fn fetch_document(source: &DataSource) -> Result<Vec<PropertyRecord>, LoadError> {
    let text = match source {
        DataSource::Url(url) => {
            let response = reqwest::Client::new()
                .get(url)
                .header(CACHE_CONTROL, "no-store")
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(LoadError::Status(response.status()));
            }
            response.text().await?
        }
        DataSource::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
    };
    let records = parse_document(&text)?;
    info!(%source, count = records.len(), "loaded property data");
    Ok(records)
}
