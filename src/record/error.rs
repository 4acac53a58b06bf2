use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read property data from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to fetch property data: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Property data request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to parse property data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Property data must be an array or an object with a `properties` array")]
    Shape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let error = LoadError::Status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(
            format!("{}", error),
            "Property data request failed with status 404 Not Found"
        );

        let error = LoadError::Io {
            path: PathBuf::from("data.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            format!("{}", error),
            "Failed to read property data from data.json: missing"
        );
    }
}
