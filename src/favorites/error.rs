use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Failed to create storage directory: {0}")]
    CreateDirError(std::io::Error),

    #[error("Failed to read storage key {key}: {source}")]
    ReadError {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to write storage key {key}: {source}")]
    WriteError {
        key: String,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Failed to persist favorites: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}
