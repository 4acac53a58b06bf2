pub mod error;
pub mod storage;
pub mod store;
#[cfg(test)]
mod tests;

pub use error::{FavoritesError, StorageError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{FAVORITES_KEY, FavoritesSet, FavoritesStore};
